use serde::{Deserialize, Serialize};

use super::ids::{CompanyId, UserId};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
}

/// Everything a request needs to know about who is asking and on behalf of which company.
///
/// There is one of these per signed-in user. It is created when authentication succeeds,
/// replaced when the user switches company, and dropped on logout; see
/// [crate::Navigator::init_session] and [crate::Navigator::teardown].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub api_url: String,
    pub token: String,
    pub user: User,
    pub company: Option<Company>,
}

impl Session {
    pub fn new(api_url: &str, token: &str, user: User) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            user,
            company: None,
        }
    }

    pub fn with_company(mut self, company: Company) -> Self {
        self.company = Some(company);
        self
    }
}
