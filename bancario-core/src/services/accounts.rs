//! Account service

use crate::domain::audit::Edited;
use crate::domain::result::Result;
use crate::domain::{Account, AccountCreate, AccountUpdate, BalanceUpdate, Page};
use crate::ports::ApiRequest;

use super::resource::{Resource, ResourceService};

const BALANCE_ENDPOINT: &str = "/cuentas/actualizar-saldo";

impl Resource for Account {
    const ENDPOINT: &'static str = "/cuentas";
    const NAME: &'static str = "account";
    type Create = AccountCreate;
    type Update = AccountUpdate;

    fn id(&self) -> &str {
        &self.id
    }
}

pub type AccountService = ResourceService<Account>;

impl ResourceService<Account> {
    /// GET `/cuentas/numero/{number}`
    pub async fn get_by_number(&self, number: &str) -> Result<Account> {
        self.fetch(ApiRequest::get(Self::nested(&["numero", number])))
            .await
    }

    /// Fetch a page and keep accounts whose number, type or id contains `term`
    pub async fn search(&self, term: &str, page: Page) -> Result<Vec<Account>> {
        let accounts = self.list(page).await?;
        Ok(accounts
            .into_iter()
            .filter(|a| a.matches_search(term))
            .collect())
    }

    /// PUT `/cuentas/actualizar-saldo`; returns the account with its new balance
    pub async fn apply_balance(&self, update: &BalanceUpdate) -> Result<Account> {
        let user_id = self.require_user_id()?;
        let body = Edited {
            body: update,
            id_usuario_edicion: &user_id,
        };
        self.gateway.put(BALANCE_ENDPOINT, &body).await
    }
}
