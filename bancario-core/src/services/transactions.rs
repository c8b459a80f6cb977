//! Transaction record service
//!
//! Plain CRUD over `/transacciones/`. Moving money goes through
//! [`TransactionOrchestrator`](super::operations::TransactionOrchestrator),
//! which also updates the account balance.

use crate::domain::result::Result;
use crate::domain::{Transaction, TransactionCreate, TransactionQuery, TransactionUpdate};
use crate::ports::ApiRequest;

use super::resource::{Resource, ResourceService};

impl Resource for Transaction {
    const ENDPOINT: &'static str = "/transacciones/";
    const NAME: &'static str = "transaction";
    type Create = TransactionCreate;
    type Update = TransactionUpdate;

    fn id(&self) -> &str {
        &self.id
    }
}

pub type TransactionService = ResourceService<Transaction>;

impl ResourceService<Transaction> {
    /// GET `/transacciones/` with paging and optional type
    pub async fn list_query(&self, query: &TransactionQuery) -> Result<Vec<Transaction>> {
        self.fetch(ApiRequest::get(Transaction::ENDPOINT).with_query(query.to_params()))
            .await
    }

    /// GET `/transacciones/cuenta/{account_id}`
    pub async fn by_account(&self, account_id: &str) -> Result<Vec<Transaction>> {
        self.fetch(ApiRequest::get(Self::nested(&["cuenta", account_id])))
            .await
    }
}
