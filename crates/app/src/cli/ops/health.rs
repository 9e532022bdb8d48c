use clap::Args;

use service::state::AppState;

#[derive(Args, Debug, Clone)]
pub struct Health;

#[derive(Debug, thiserror::Error)]
pub enum HealthError {
    #[error("Health check failed: {0}")]
    Failed(String),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Health {
    type Error = HealthError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut lines = Vec::new();

        lines.push("Config:".to_string());
        match AppState::load(ctx.config_path.clone()) {
            Ok(state) => {
                lines.push(format!("  directory:    {}", state.app_dir.display()));
                lines.push("  config.toml:  OK".to_string());
                lines.push("  db.sqlite:    OK".to_string());
                lines.push("  key.pem:      OK".to_string());
                lines.push("  content/:     OK".to_string());
                lines.push(format!("  api_port:     {}", state.config.api_port));
                lines.push(format!(
                    "  content:      {}",
                    state.config.content_store.backend()
                ));
            }
            Err(e) => {
                lines.push(format!("  error: {}", e));
            }
        }

        let base = ctx.client.base_url();
        let client = ctx.client.http_client();

        lines.push(String::new());
        lines.push(format!("Registry ({}):", base));

        for check in ["livez", "readyz"] {
            let url = format!("{}/_status/{}", base.as_str().trim_end_matches('/'), check);
            let label = format!("{}:", check);
            let line = match client.get(&url).send().await {
                Ok(resp) if resp.status().is_success() => format!("  {:<7} OK", label),
                Ok(resp) => format!("  {:<7} UNHEALTHY ({})", label, resp.status()),
                Err(_) => format!("  {:<7} NOT REACHABLE", label),
            };
            lines.push(line);
        }

        Ok(lines.join("\n"))
    }
}
