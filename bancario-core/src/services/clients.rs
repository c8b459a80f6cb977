//! Client (customer) service

use crate::domain::result::Result;
use crate::domain::{Client, ClientCreate, ClientFilter, ClientUpdate, Page};
use crate::ports::ApiRequest;

use super::resource::{Resource, ResourceService};

impl Resource for Client {
    const ENDPOINT: &'static str = "/clientes";
    const NAME: &'static str = "client";
    type Create = ClientCreate;
    type Update = ClientUpdate;

    fn id(&self) -> &str {
        &self.id
    }
}

pub type ClientService = ResourceService<Client>;

impl ResourceService<Client> {
    /// GET `/clientes` with the filter as query parameters. The filter is
    /// applied again to the response, since the backend ignores parameters
    /// it does not support.
    pub async fn list_filtered(&self, filter: &ClientFilter, page: Page) -> Result<Vec<Client>> {
        let mut params = filter.to_params();
        params.extend(page.to_params());
        let clients: Vec<Client> = self
            .fetch(ApiRequest::get(Client::ENDPOINT).with_query(params))
            .await?;
        Ok(clients.into_iter().filter(|c| filter.matches(c)).collect())
    }

    /// GET `/clientes/search?search=term`
    pub async fn search(&self, term: &str) -> Result<Vec<Client>> {
        self.fetch(
            ApiRequest::get(Self::path("search"))
                .with_query(vec![("search".to_string(), term.trim().to_string())]),
        )
        .await
    }

    /// GET `/clientes/sucursal/{branch_id}`
    pub async fn by_branch(&self, branch_id: &str) -> Result<Vec<Client>> {
        self.fetch(ApiRequest::get(Self::nested(&["sucursal", branch_id])))
            .await
    }
}
