use std::fs;
use std::path::PathBuf;

use crate::model::errors::{NavErrKind, NavResult};
use crate::model::ids::CompanyId;
use crate::model::session::{Company, Session, User};
use crate::Navigator;

pub static SESSION_FILE: &str = "session.json";

impl Navigator {
    /// The signed-in session, for calls that don't need a company.
    pub(crate) async fn session(&self) -> NavResult<Session> {
        self.session
            .read()
            .await
            .clone()
            .ok_or_else(|| NavErrKind::NotAuthenticated.into())
    }

    /// The signed-in session together with the company every folder and document call is
    /// scoped to.
    pub(crate) async fn company_session(&self) -> NavResult<(Session, CompanyId)> {
        let session = self.session().await?;
        let company = session
            .company
            .as_ref()
            .map(|c| c.id)
            .ok_or(NavErrKind::NoCompanySelected)?;
        Ok((session, company))
    }

    pub async fn current_session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    /// Adopts `session`, dropping every bit of navigation state that belonged to the previous
    /// one, and caches it on disk for the next [Navigator::restore_session].
    #[instrument(level = "debug", skip_all, fields(user = %session.user.email), err(Debug))]
    pub async fn init_session(&self, session: Session) -> NavResult<()> {
        *self.session.write().await = Some(session.clone());
        self.state.write().await.reset();

        self.persist_session(&session)?;
        self.events.session_changed();
        Ok(())
    }

    /// Picks up the session a previous run cached. A missing cache is not an error, an unreadable
    /// one is logged and ignored.
    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn restore_session(&self) -> NavResult<Option<Session>> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)?;
        let session: Session = match serde_json::from_str(&contents) {
            Ok(session) => session,
            Err(err) => {
                warn!(?err, ?path, "cached session is unreadable, ignoring it");
                return Ok(None);
            }
        };

        *self.session.write().await = Some(session.clone());
        self.state.write().await.reset();
        self.events.session_changed();

        Ok(Some(session))
    }

    /// Scopes the session to `company`. Folder, document and upload state of the old company
    /// is discarded and loads still in flight for it are ignored when they land.
    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn switch_company(&self, company: Company) -> NavResult<()> {
        let session = {
            let mut guard = self.session.write().await;
            let session = guard.as_mut().ok_or(NavErrKind::NotAuthenticated)?;
            session.company = Some(company);
            session.clone()
        };
        self.state.write().await.reset();

        self.persist_session(&session)?;
        self.events.session_changed();
        Ok(())
    }

    /// Signs out: forgets the session in memory and on disk and resets navigation state.
    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn teardown(&self) -> NavResult<()> {
        *self.session.write().await = None;
        self.state.write().await.reset();

        let path = self.session_path();
        if path.exists() {
            fs::remove_file(path)?;
        }

        self.events.session_changed();
        Ok(())
    }

    /// Exchanges credentials for a token at [crate::Config::api_url] and starts a session with
    /// no company selected.
    #[instrument(level = "debug", skip(self, password), err(Debug))]
    pub async fn login(&self, email: &str, password: &str) -> NavResult<Session> {
        let api_url = self.config.api_url.clone();
        let token = self.backend.login(&api_url, email, password).await?.token;

        // the login endpoint only hands back a token, the user's name is not known yet
        let user = User { id: Default::default(), email: email.to_string(), name: email.to_string() };
        let session = Session::new(&api_url, &token, user);

        self.init_session(session.clone()).await?;
        Ok(session)
    }

    /// Companies the signed-in user belongs to.
    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn companies(&self) -> NavResult<Vec<Company>> {
        let session = self.session().await?;
        self.backend.my_companies(&session).await
    }

    fn session_path(&self) -> PathBuf {
        PathBuf::from(&self.config.writeable_path).join(SESSION_FILE)
    }

    fn persist_session(&self, session: &Session) -> NavResult<()> {
        fs::create_dir_all(&self.config.writeable_path)?;
        fs::write(self.session_path(), serde_json::to_vec(session)?)?;
        Ok(())
    }
}
