use service::http_server::api::client::ApiError;
use service::http_server::api::v0::board::{ListRequest, ListResponse};

#[async_trait::async_trait]
impl crate::cli::op::Op for ListRequest {
    type Error = ApiError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let response: ListResponse = ctx.client.call(self.clone()).await?;

        if response.boards.is_empty() {
            return Ok("No boards found".to_string());
        }

        Ok(response
            .boards
            .iter()
            .map(|b| format!("{} v{} {} ({})", b.board_id, b.version, b.content_address, b.owner))
            .collect::<Vec<_>>()
            .join("\n"))
    }
}
