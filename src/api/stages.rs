//! Pipeline stage endpoints

use async_trait::async_trait;

use crm_domain::commands::StageApi;
use crm_domain::endpoints::{self, StageQuery};
use crm_domain::{encode_body, ApiResult, ReorderRequest, Stage, StageInput};

use super::{execute, fetch_list, HttpApi};

#[async_trait(?Send)]
impl StageApi for HttpApi {
    async fn list_stages(&self, query: &StageQuery) -> ApiResult<Vec<Stage>> {
        fetch_list(&self.url(&endpoints::list_stages(query))).await
    }

    async fn create_stage(&self, company_id: &str, input: &StageInput) -> ApiResult<()> {
        execute("POST", &self.url(&endpoints::create_stage(company_id)), Some(encode_body(input)?)).await
    }

    async fn update_stage(&self, id: &str, input: &StageInput) -> ApiResult<()> {
        execute("PUT", &self.url(&endpoints::stage(id)), Some(encode_body(input)?)).await
    }

    async fn delete_stage(&self, id: &str) -> ApiResult<()> {
        execute("DELETE", &self.url(&endpoints::stage(id)), None).await
    }

    async fn reorder_stages(&self, company_id: &str, request: &ReorderRequest) -> ApiResult<()> {
        execute("PATCH", &self.url(&endpoints::reorder_stages(company_id)), Some(encode_body(request)?)).await
    }
}
