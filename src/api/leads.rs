//! Lead endpoints

use async_trait::async_trait;

use crm_domain::commands::LeadApi;
use crm_domain::endpoints::{self, LeadQuery};
use crm_domain::{encode_body, ApiResult, Lead, LeadInput};

use super::{execute, fetch_list, HttpApi};

#[async_trait(?Send)]
impl LeadApi for HttpApi {
    async fn list_leads(&self, query: &LeadQuery) -> ApiResult<Vec<Lead>> {
        fetch_list(&self.url(&endpoints::list_leads(query))).await
    }

    async fn create_lead(&self, company_id: &str, input: &LeadInput) -> ApiResult<()> {
        execute("POST", &self.url(&endpoints::create_lead(company_id)), Some(encode_body(input)?)).await
    }

    async fn convert_lead(&self, id: &str) -> ApiResult<()> {
        execute("POST", &self.url(&endpoints::convert_lead(id)), None).await
    }
}
