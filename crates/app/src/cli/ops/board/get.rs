use service::http_server::api::client::ApiError;
use service::http_server::api::v0::board::GetRequest;

#[async_trait::async_trait]
impl crate::cli::op::Op for GetRequest {
    type Error = ApiError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let record = ctx.client.call(self.clone()).await?;
        Ok(super::describe(&record))
    }
}
