#[cfg(test)]
mod workflow_tests {
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use ossflow::oss::{
        ContainerDescriptor, ListOptions, LoggingStorageClient, MemoryAuthClient,
        MemoryAuthClientConfig, MemoryStorageClient, MemoryStorageClientConfig, MemoryUser,
        ObjectDescriptor,
    };
    use ossflow::{
        AuthClient, Credentials, Metadata, ServiceEntry, Step, StorageClient, StorageError,
        Workflow, WorkflowConfig, WorkflowError,
    };

    const ENDPOINT: &str = "http://127.0.0.1:8080/v1/AUTH_demo";

    fn credentials() -> Credentials {
        Credentials {
            host: "http://127.0.0.1:5000/v2.0".to_string(),
            username: "demo".to_string(),
            password: "secret".to_string(),
            project_name: "demo".to_string(),
        }
    }

    fn workflow_config() -> WorkflowConfig {
        WorkflowConfig {
            credentials: credentials(),
            container: "c1".to_string(),
            ..Default::default()
        }
    }

    fn auth_with(catalog: Vec<ServiceEntry>, token_ttl: Duration) -> Arc<dyn AuthClient> {
        let config = MemoryAuthClientConfig {
            users: vec![MemoryUser {
                username: "demo".to_string(),
                password: "secret".to_string(),
                project_name: "demo".to_string(),
            }],
            catalog,
            token_ttl,
        };
        Arc::new(MemoryAuthClient::new(config).unwrap())
    }

    fn auth() -> Arc<dyn AuthClient> {
        auth_with(
            vec![
                ServiceEntry::new("compute", ["http://127.0.0.1:8774/v2"]),
                ServiceEntry::new("object-store", [ENDPOINT]),
            ],
            Duration::from_secs(3600),
        )
    }

    fn memory_storage() -> MemoryStorageClient {
        MemoryStorageClient::new(MemoryStorageClientConfig {
            endpoint: ENDPOINT.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    /// 对结果动手脚，模拟行为不正确的服务端
    #[derive(Clone, Copy, PartialEq)]
    enum Fault {
        None,
        FailOn(&'static str),
        DuplicateObjectListing,
        IgnoreContainerMetadata,
        IgnoreObjectMetadata,
        CorruptDownload,
    }

    /// 记录调用顺序并按 Fault 注入故障的 StorageClient
    struct ScriptedStorage {
        inner: MemoryStorageClient,
        fault: Fault,
        calls: Mutex<Vec<&'static str>>,
    }

    impl ScriptedStorage {
        fn new(fault: Fault) -> Arc<Self> {
            Arc::new(Self {
                inner: memory_storage(),
                fault,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }

        fn enter(&self, method: &'static str) -> Result<(), StorageError> {
            self.calls.lock().unwrap().push(method);
            if self.fault == Fault::FailOn(method) {
                return Err(StorageError::Provider {
                    provider: "scripted".to_string(),
                    message: format!("{} unavailable", method),
                    source: None,
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl StorageClient for ScriptedStorage {
        async fn get_account_metadata(&self, url: &str, token: &str) -> Result<Metadata, StorageError> {
            self.enter("get_account_metadata")?;
            self.inner.get_account_metadata(url, token).await
        }

        async fn create_container(
            &self,
            url: &str,
            token: &str,
            headers: &Metadata,
        ) -> Result<(), StorageError> {
            self.enter("create_container")?;
            self.inner.create_container(url, token, headers).await
        }

        async fn list_containers(
            &self,
            url: &str,
            token: &str,
            options: &ListOptions,
        ) -> Result<Vec<ContainerDescriptor>, StorageError> {
            self.enter("list_containers")?;
            self.inner.list_containers(url, token, options).await
        }

        async fn set_container_metadata(
            &self,
            url: &str,
            token: &str,
            key: &str,
            value: &str,
        ) -> Result<(), StorageError> {
            self.enter("set_container_metadata")?;
            if self.fault == Fault::IgnoreContainerMetadata {
                return Ok(());
            }
            self.inner.set_container_metadata(url, token, key, value).await
        }

        async fn get_container_metadata(&self, url: &str, token: &str) -> Result<Metadata, StorageError> {
            self.enter("get_container_metadata")?;
            self.inner.get_container_metadata(url, token).await
        }

        async fn delete_container(&self, url: &str, token: &str) -> Result<(), StorageError> {
            self.enter("delete_container")?;
            self.inner.delete_container(url, token).await
        }

        async fn put_object(
            &self,
            url: &str,
            token: &str,
            content: Bytes,
            headers: &Metadata,
        ) -> Result<(), StorageError> {
            self.enter("put_object")?;
            self.inner.put_object(url, token, content, headers).await
        }

        async fn list_objects(
            &self,
            url: &str,
            token: &str,
            options: &ListOptions,
        ) -> Result<Vec<ObjectDescriptor>, StorageError> {
            self.enter("list_objects")?;
            let mut objects = self.inner.list_objects(url, token, options).await?;
            if self.fault == Fault::DuplicateObjectListing {
                objects.extend(objects.clone());
            }
            Ok(objects)
        }

        async fn set_object_metadata(
            &self,
            url: &str,
            token: &str,
            key: &str,
            value: &str,
        ) -> Result<(), StorageError> {
            self.enter("set_object_metadata")?;
            if self.fault == Fault::IgnoreObjectMetadata {
                return Ok(());
            }
            self.inner.set_object_metadata(url, token, key, value).await
        }

        async fn get_object_metadata(&self, url: &str, token: &str) -> Result<Metadata, StorageError> {
            self.enter("get_object_metadata")?;
            self.inner.get_object_metadata(url, token).await
        }

        async fn get_object(&self, url: &str, token: &str) -> Result<Bytes, StorageError> {
            self.enter("get_object")?;
            let body = self.inner.get_object(url, token).await?;
            if self.fault == Fault::CorruptDownload {
                let mut corrupted = body.to_vec();
                if let Some(last) = corrupted.last_mut() {
                    *last ^= 0xff;
                }
                return Ok(Bytes::from(corrupted));
            }
            Ok(body)
        }

        async fn copy_object(
            &self,
            source_url: &str,
            dest_path: &str,
            token: &str,
        ) -> Result<(), StorageError> {
            self.enter("copy_object")?;
            self.inner.copy_object(source_url, dest_path, token).await
        }

        async fn delete_object(&self, url: &str, token: &str) -> Result<(), StorageError> {
            self.enter("delete_object")?;
            self.inner.delete_object(url, token).await
        }
    }

    async fn remaining_containers(storage: &ScriptedStorage) -> Vec<String> {
        storage
            .inner
            .list_containers(ENDPOINT, "any", &ListOptions::default())
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect()
    }

    #[tokio::test]
    async fn test_full_workflow_succeeds_and_cleans_up() {
        let storage = ScriptedStorage::new(Fault::None);
        let workflow = Workflow::new(workflow_config(), auth(), storage.clone()).unwrap();

        let report = workflow.run("o1", Bytes::from_static(b"hello")).await.unwrap();

        assert_eq!(report.endpoint, format!("{}/", ENDPOINT));
        assert_eq!(report.container, "c1");
        assert_eq!(report.object, "o1");
        assert_eq!(report.duplicate, "o1.dup");
        assert_eq!(report.bytes, 5);
        let steps: Vec<Step> = report.steps.iter().map(|r| r.step).collect();
        assert_eq!(steps, Step::ALL.to_vec());

        assert_eq!(
            storage.calls(),
            vec![
                "get_account_metadata",
                "create_container",
                "list_containers",
                "set_container_metadata",
                "get_container_metadata",
                "put_object",
                "list_objects",
                "set_object_metadata",
                "get_object_metadata",
                "get_object",
                "copy_object",
                "delete_object",
                "delete_object",
                "delete_container",
            ]
        );
        assert!(remaining_containers(&storage).await.is_empty());
    }

    #[tokio::test]
    async fn test_copy_is_verified_when_enabled() {
        let storage = ScriptedStorage::new(Fault::None);
        let config = WorkflowConfig {
            verify_copy: true,
            ..workflow_config()
        };
        let workflow = Workflow::new(config, auth(), storage.clone()).unwrap();

        workflow.run("o1", Bytes::from_static(b"hello")).await.unwrap();

        let calls = storage.calls();
        let copy_at = calls.iter().position(|c| *c == "copy_object").unwrap();
        assert_eq!(calls[copy_at + 1], "get_object");
        assert_eq!(calls.iter().filter(|c| **c == "get_object").count(), 2);
    }

    #[tokio::test]
    async fn test_workflow_can_run_repeatedly() {
        let storage = ScriptedStorage::new(Fault::None);
        let workflow = Workflow::new(workflow_config(), auth(), storage.clone()).unwrap();

        workflow.run("o1", Bytes::from_static(b"first")).await.unwrap();
        workflow.run("o1", Bytes::from_static(b"second")).await.unwrap();
        assert!(remaining_containers(&storage).await.is_empty());
    }

    #[tokio::test]
    async fn test_object_names_are_encoded() {
        let storage = ScriptedStorage::new(Fault::None);
        let workflow = Workflow::new(workflow_config(), auth(), storage.clone()).unwrap();

        let report = workflow
            .run("dir/a b?.txt", Bytes::from_static(b"payload"))
            .await
            .unwrap();
        assert_eq!(report.duplicate, "dir/a b?.txt.dup");
        assert!(remaining_containers(&storage).await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_content() {
        let storage = ScriptedStorage::new(Fault::None);
        let config = WorkflowConfig {
            verify_copy: true,
            ..workflow_config()
        };
        let workflow = Workflow::new(config, auth(), storage).unwrap();

        let report = workflow.run("empty", Bytes::new()).await.unwrap();
        assert_eq!(report.bytes, 0);
    }

    #[tokio::test]
    async fn test_logging_decorator_is_transparent() {
        let storage = Arc::new(LoggingStorageClient::from_parts(
            Arc::new(memory_storage()),
            log::Level::Debug,
        ));
        let workflow = Workflow::new(workflow_config(), auth(), storage).unwrap();

        let report = workflow.run("o1", Bytes::from_static(b"hello")).await.unwrap();
        assert_eq!(report.steps.len(), 13);
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let storage = ScriptedStorage::new(Fault::None);
        let mut config = workflow_config();
        config.credentials.password = "wrong".to_string();
        let workflow = Workflow::new(config, auth(), storage.clone()).unwrap();

        let err = workflow.run("o1", Bytes::from_static(b"hello")).await.unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::AuthenticationFailed(StorageError::Authentication(_))
        ));
        assert_eq!(err.step(), Some(Step::Authenticate));
        assert!(storage.calls().is_empty());
    }

    #[tokio::test]
    async fn test_expired_token_stops_before_storage() {
        let storage = ScriptedStorage::new(Fault::None);
        let auth = auth_with(
            vec![ServiceEntry::new("object-store", [ENDPOINT])],
            Duration::ZERO,
        );
        let workflow = Workflow::new(workflow_config(), auth, storage.clone()).unwrap();

        let err = workflow.run("o1", Bytes::from_static(b"hello")).await.unwrap_err();
        assert!(matches!(err, WorkflowError::TokenExpired { .. }));
        assert!(storage.calls().is_empty());
    }

    #[tokio::test]
    async fn test_catalog_without_object_store() {
        let storage = ScriptedStorage::new(Fault::None);
        let auth = auth_with(
            vec![ServiceEntry::new("compute", ["http://127.0.0.1:8774/v2"])],
            Duration::from_secs(60),
        );
        let workflow = Workflow::new(workflow_config(), auth, storage.clone()).unwrap();

        let err = workflow.run("o1", Bytes::from_static(b"hello")).await.unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::EndpointNotFound { ref service_type } if service_type == "object-store"
        ));
        assert_eq!(err.step(), Some(Step::ResolveEndpoint));
        assert!(storage.calls().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_endpoint() {
        let storage = ScriptedStorage::new(Fault::None);
        let workflow = Workflow::new(workflow_config(), auth(), storage.clone()).unwrap();

        let (session, endpoint) = workflow.resolve_endpoint().await.unwrap();
        assert_eq!(endpoint, format!("{}/", ENDPOINT));
        assert!(!session.token.is_empty());
        assert!(storage.calls().is_empty());
    }

    #[tokio::test]
    async fn test_capability_failure_is_attributed_to_step() {
        let cases = [
            ("get_account_metadata", Step::GetAccountMetadata),
            ("create_container", Step::CreateContainer),
            ("list_containers", Step::ListContainers),
            ("get_container_metadata", Step::ContainerMetadata),
            ("put_object", Step::PutObject),
            ("list_objects", Step::ListObjects),
            ("set_object_metadata", Step::ObjectMetadata),
            ("get_object", Step::GetObject),
            ("copy_object", Step::CopyObject),
            ("delete_object", Step::DeleteObjects),
            ("delete_container", Step::DeleteContainer),
        ];

        for (method, step) in cases {
            let storage = ScriptedStorage::new(Fault::FailOn(method));
            let workflow = Workflow::new(workflow_config(), auth(), storage.clone()).unwrap();

            let err = workflow.run("o1", Bytes::from_static(b"hello")).await.unwrap_err();
            assert!(
                matches!(
                    err,
                    WorkflowError::CapabilityCallFailed { step: s, source: StorageError::Provider { .. } } if s == step
                ),
                "{} should fail at {}, got {}",
                method,
                step,
                err
            );
            assert_eq!(storage.calls().last(), Some(&method));
        }
    }

    #[tokio::test]
    async fn test_failure_leaves_resources_in_place() {
        let storage = ScriptedStorage::new(Fault::FailOn("copy_object"));
        let workflow = Workflow::new(workflow_config(), auth(), storage.clone()).unwrap();

        let err = workflow.run("o1", Bytes::from_static(b"hello")).await.unwrap_err();
        assert_eq!(err.step(), Some(Step::CopyObject));
        assert_eq!(remaining_containers(&storage).await, vec!["c1".to_string()]);
        assert!(!storage.calls().contains(&"delete_object"));
    }

    #[tokio::test]
    async fn test_container_metadata_must_round_trip() {
        let storage = ScriptedStorage::new(Fault::IgnoreContainerMetadata);
        let workflow = Workflow::new(workflow_config(), auth(), storage.clone()).unwrap();

        let err = workflow.run("o1", Bytes::from_static(b"hello")).await.unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::InvariantViolated { step: Step::ContainerMetadata, ref actual, .. }
                if actual == "X-Container-Meta-fubar absent"
        ));
        assert!(!storage.calls().contains(&"put_object"));
    }

    #[tokio::test]
    async fn test_object_metadata_must_round_trip() {
        let storage = ScriptedStorage::new(Fault::IgnoreObjectMetadata);
        let workflow = Workflow::new(workflow_config(), auth(), storage.clone()).unwrap();

        let err = workflow.run("o1", Bytes::from_static(b"hello")).await.unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::InvariantViolated { step: Step::ObjectMetadata, ref expected, ref actual }
                if expected == "X-Object-Meta-fubar = true" && actual == "X-Object-Meta-fubar = false"
        ));
        assert!(!storage.calls().contains(&"get_object"));
        assert_eq!(remaining_containers(&storage).await, vec!["c1".to_string()]);
    }

    #[tokio::test]
    async fn test_object_must_be_listed_once() {
        let storage = ScriptedStorage::new(Fault::DuplicateObjectListing);
        let workflow = Workflow::new(workflow_config(), auth(), storage.clone()).unwrap();

        let err = workflow.run("o1", Bytes::from_static(b"hello")).await.unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::InvariantViolated { step: Step::ListObjects, ref actual, .. }
                if actual == "listed 2 times"
        ));
    }

    #[tokio::test]
    async fn test_download_must_match_upload() {
        let storage = ScriptedStorage::new(Fault::CorruptDownload);
        let workflow = Workflow::new(workflow_config(), auth(), storage.clone()).unwrap();

        let err = workflow.run("o1", Bytes::from_static(b"hello")).await.unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::InvariantViolated { step: Step::GetObject, ref actual, .. }
                if actual == "5 bytes, first difference at offset 4"
        ));
        assert!(!storage.calls().contains(&"copy_object"));
    }

    #[tokio::test]
    async fn test_invalid_config() {
        let storage = ScriptedStorage::new(Fault::None);

        let config = WorkflowConfig {
            container: String::new(),
            ..workflow_config()
        };
        assert!(matches!(
            Workflow::new(config, auth(), storage.clone()),
            Err(WorkflowError::InvalidConfig(_))
        ));

        let config = WorkflowConfig {
            container: "a/b".to_string(),
            ..workflow_config()
        };
        assert!(Workflow::new(config, auth(), storage.clone()).is_err());

        let workflow = Workflow::new(workflow_config(), auth(), storage.clone()).unwrap();
        let err = workflow.run("", Bytes::from_static(b"hello")).await.unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidConfig(_)));
        assert_eq!(err.step(), None);
        assert!(storage.calls().is_empty());
    }
}
