// Endpoint command implementation

use anyhow::Result;

use ossflow::Workflow;

/// Execute the endpoint command
pub async fn execute_endpoint(workflow: &Workflow) -> Result<()> {
    let (session, endpoint) = workflow.resolve_endpoint().await?;

    println!("Endpoint:      {}", endpoint);
    println!("Token Expires: {}", session.expires.format("%Y-%m-%d %H:%M:%S UTC"));

    Ok(())
}
