pub mod assert;
pub mod mock;

use std::env;
use std::sync::Arc;

use chrono::Utc;
use docnav::model::document::Document;
use docnav::model::folder::Folder;
use docnav::model::ids::{CompanyId, FolderId};
use docnav::model::session::{Session, User};
use docnav::model::upload::UploadFile;
use docnav::{Config, Navigator};
use uuid::Uuid;

pub use crate::assert::*;
pub use crate::mock::{Gate, MockBackend};

pub fn test_config() -> Config {
    Config {
        api_url: "http://localhost:8080/api".to_string(),
        writeable_path: format!("{}/{}", env::temp_dir().display(), Uuid::new_v4()),
        logs: false,
        stdout_logs: false,
        colored_logs: false,
        max_upload_bytes: 1024,
        show_root: true,
    }
}

/// A navigator over a fresh [MockBackend] with nobody signed in.
pub fn test_navigator() -> (Navigator, Arc<MockBackend>) {
    let backend = Arc::new(MockBackend::new());
    (Navigator::with_backend(test_config(), backend.clone()), backend)
}

/// A navigator signed in and scoped to the mock's company.
pub async fn signed_in_navigator() -> (Navigator, Arc<MockBackend>) {
    let (nav, backend) = test_navigator();
    nav.init_session(test_session().with_company(backend.company.clone()))
        .await
        .unwrap();
    (nav, backend)
}

pub fn test_session() -> Session {
    let user = User {
        id: Uuid::new_v4(),
        email: "ada@example.com".to_string(),
        name: "Ada".to_string(),
    };
    Session::new("http://localhost:8080/api", &Uuid::new_v4().to_string(), user)
}

pub fn folder(company_id: CompanyId, name: &str, parent: Option<FolderId>) -> Folder {
    Folder {
        id: Uuid::new_v4(),
        company_id,
        parent_folder_id: parent,
        name: name.to_string(),
        size: 0,
        count: 0,
    }
}

pub fn document(company_id: CompanyId, name: &str, folder_id: Option<FolderId>) -> Document {
    let id = Uuid::new_v4();
    Document {
        id,
        company_id,
        folder_id,
        name: name.to_string(),
        file_path: format!("{company_id}/{id}"),
        preview_file_path: None,
        preview_url: None,
        download_url: None,
        file_size: 3,
        mime_type: "application/pdf".to_string(),
        checksum: random_name(),
        sender_id: None,
        sender: None,
        created_by: None,
        updated_by: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        tags: vec![],
    }
}

/// A file of `size` bytes. Kept small, [test_config] caps uploads at 1 KiB.
pub fn upload_file(name: &str, mime_type: &str, size: usize) -> UploadFile {
    UploadFile::new(name, mime_type, vec![b'x'; size])
}

pub fn random_name() -> String {
    Uuid::new_v4()
        .to_string()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Yields until `method` has been called at least `times` times. Used to know a spawned
/// operation has reached a held call.
pub async fn until_called(backend: &MockBackend, method: &str, times: usize) {
    for _ in 0..10_000 {
        if backend.calls(method) >= times {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("{method} was not called {times} times");
}
