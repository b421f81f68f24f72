//! PDF statements attached to problems

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    constants::{PDF_EXTENSION, PDF_NAME_TOKEN_LENGTH, PDF_SIGNATURE},
    error::{AppError, AppResult},
    gateways::{AuthGateway, BlobStore, PermissionGateway, ProblemStore},
    models::Problem,
    utils::{random_token, slugify},
};

use super::access::ProblemAccess;

/// A stored PDF and the name it lives under
#[derive(Debug, Clone, PartialEq)]
pub struct PdfBlob {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Validates uploads and keeps `Problem::pdf_url` pointing at the current one.
/// Only one PDF per problem is kept.
pub struct PdfAttachmentHandler {
    access: ProblemAccess,
    store: Arc<dyn ProblemStore>,
    blobs: Arc<dyn BlobStore>,
    max_bytes: usize,
}

impl PdfAttachmentHandler {
    pub fn new(
        auth: Arc<dyn AuthGateway>,
        permissions: Arc<dyn PermissionGateway>,
        store: Arc<dyn ProblemStore>,
        blobs: Arc<dyn BlobStore>,
        max_bytes: usize,
    ) -> Self {
        Self {
            access: ProblemAccess::new(auth, permissions, store.clone()),
            store,
            blobs,
            max_bytes,
        }
    }

    /// Run the management gates alone, for callers that must report a gate
    /// failure ahead of a malformed upload
    pub async fn authorize(&self, problem_id: Uuid, token: &str) -> AppResult<()> {
        self.access.require_manage(problem_id, token).await.map(|_| ())
    }

    pub async fn attach(
        &self,
        problem_id: Uuid,
        bytes: &[u8],
        file_name: &str,
        token: &str,
    ) -> AppResult<Problem> {
        let (problem, identity) = self.access.require_manage(problem_id, token).await?;
        validate_pdf(file_name, bytes, self.max_bytes)?;

        let name = storage_name(&problem.title);
        self.blobs.write(&name, bytes).await?;

        let (saved, previous) = match self.point_to(problem_id, &name).await {
            Ok(done) => done,
            Err(e) => {
                if let Err(cleanup) = self.blobs.remove(&name).await {
                    warn!(blob = %name, error = %cleanup, "Failed to remove orphaned PDF");
                }
                return Err(e);
            }
        };

        if let Some(previous) = previous.filter(|p| *p != name) {
            if let Err(e) = self.blobs.remove(&previous).await {
                warn!(blob = %previous, error = %e, "Failed to remove replaced PDF");
            }
        }

        info!(
            %problem_id,
            account_id = %identity.account_id,
            blob = %name,
            size = bytes.len(),
            "PDF attached"
        );

        Ok(saved)
    }

    pub async fn fetch(&self, problem_id: Uuid, token: &str) -> AppResult<PdfBlob> {
        let (problem, _) = self.access.require_manage(problem_id, token).await?;

        let name = problem
            .pdf_url
            .ok_or_else(|| AppError::ItemNotFound("No PDF attached".to_string()))?;
        let bytes = self.blobs.read(&name).await?;

        Ok(PdfBlob { name, bytes })
    }

    /// Swap the stored name under the problem lock; returns the previous name
    async fn point_to(&self, problem_id: Uuid, name: &str) -> AppResult<(Problem, Option<String>)> {
        let mut tx = self.store.begin().await?;
        let mut problem = tx
            .lock_problem(problem_id)
            .await?
            .ok_or_else(AppError::problem_not_found)?;

        let previous = problem.pdf_url.replace(name.to_string());
        problem.updated_date = Utc::now();

        let saved = tx.save(&problem).await?;
        tx.commit().await?;

        Ok((saved, previous))
    }
}

/// Both the extension and the magic bytes must match; neither implies the other
pub fn validate_pdf(file_name: &str, bytes: &[u8], max_bytes: usize) -> AppResult<()> {
    if bytes.len() > max_bytes {
        return Err(AppError::InvalidFile(format!(
            "File exceeds {} MB",
            max_bytes / (1024 * 1024)
        )));
    }

    if !file_name.to_ascii_lowercase().ends_with(PDF_EXTENSION) {
        return Err(AppError::InvalidFile(
            "File name must end with .pdf".to_string(),
        ));
    }

    if !bytes.starts_with(PDF_SIGNATURE) {
        return Err(AppError::InvalidFile(
            "File content is not a PDF document".to_string(),
        ));
    }

    Ok(())
}

/// `<slug>_<random>.pdf`
pub fn storage_name(title: &str) -> String {
    format!(
        "{}_{}{}",
        slugify(title),
        random_token(PDF_NAME_TOKEN_LENGTH),
        PDF_EXTENSION
    )
}

#[cfg(test)]
mod tests {
    use regex::Regex;

    use super::*;
    use crate::{
        constants::MAX_PROBLEM_TITLE_LENGTH,
        gateways::{auth::MockAuthGateway, permission::MockPermissionGateway},
        models::Identity,
        storage::FsBlobStore,
        test_utils::{identity, problem_owned_by, InMemoryBlobStore, InMemoryProblemStore},
    };

    const PDF: &[u8] = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n";
    const LIMIT: usize = 1024 * 1024;

    fn auth_accepting(identity: Identity) -> MockAuthGateway {
        let mut auth = MockAuthGateway::new();
        auth.expect_get_account_by_token()
            .returning(move |token| match token {
                "valid" => Ok(identity.clone()),
                _ => Err(AppError::InvalidToken),
            });
        auth
    }

    fn creator_only() -> MockPermissionGateway {
        let mut permissions = MockPermissionGateway::new();
        permissions
            .expect_can_manage()
            .returning(|identity, problem| Ok(identity.account_id == problem.creator));
        permissions
    }

    struct Fixture {
        store: InMemoryProblemStore,
        blobs: InMemoryBlobStore,
        problem_id: Uuid,
    }

    fn fixture(owner: &Identity, title: &str) -> Fixture {
        let store = InMemoryProblemStore::new();
        let mut problem = problem_owned_by(owner.account_id);
        problem.title = title.to_string();
        let problem_id = problem.problem_id;
        store.seed_problem(problem);
        Fixture {
            store,
            blobs: InMemoryBlobStore::new(),
            problem_id,
        }
    }

    fn handler(caller: Identity, fx: &Fixture) -> PdfAttachmentHandler {
        PdfAttachmentHandler::new(
            Arc::new(auth_accepting(caller)),
            Arc::new(creator_only()),
            Arc::new(fx.store.clone()),
            Arc::new(fx.blobs.clone()),
            LIMIT,
        )
    }

    #[test]
    fn test_validate_pdf_checks_extension_and_magic_independently() {
        assert!(validate_pdf("x.pdf", PDF, LIMIT).is_ok());
        assert!(validate_pdf("X.PDF", PDF, LIMIT).is_ok());
        assert!(matches!(
            validate_pdf("x.pdf", b"PK\x03\x04", LIMIT),
            Err(AppError::InvalidFile(_))
        ));
        assert!(matches!(
            validate_pdf("x.txt", PDF, LIMIT),
            Err(AppError::InvalidFile(_))
        ));
        assert!(matches!(
            validate_pdf("x.pdf", b"%PD", LIMIT),
            Err(AppError::InvalidFile(_))
        ));
    }

    #[test]
    fn test_validate_pdf_rejects_oversize() {
        let mut big = PDF.to_vec();
        big.resize(LIMIT + 1, b'0');

        assert!(validate_pdf("x.pdf", &big[..LIMIT], LIMIT).is_ok());
        assert!(matches!(
            validate_pdf("x.pdf", &big, LIMIT),
            Err(AppError::InvalidFile(_))
        ));
    }

    #[test]
    fn test_storage_name_shape() {
        let pattern = Regex::new(r"^Two_Sum_[A-Za-z0-9]{7}\.pdf$").unwrap();
        assert!(pattern.is_match(&storage_name("Two Sum")));
        assert!(storage_name("../../x").starts_with("x_"));
    }

    #[tokio::test]
    async fn test_owner_attaches_pdf() {
        let owner = identity();
        let fx = fixture(&owner, "Echo");

        let saved = handler(owner, &fx)
            .attach(fx.problem_id, PDF, "sol.pdf", "valid")
            .await
            .unwrap();

        let name = saved.pdf_url.clone().unwrap();
        assert!(Regex::new(r"^Echo_[A-Za-z0-9]{7}\.pdf$").unwrap().is_match(&name));
        assert_eq!(fx.store.problem(fx.problem_id).unwrap().pdf_url, Some(name.clone()));
        assert!(fx.blobs.contains(&name));
    }

    #[tokio::test]
    async fn test_non_owner_is_denied_and_pdf_url_unchanged() {
        let owner = identity();
        let fx = fixture(&owner, "Echo");
        let first = handler(owner, &fx)
            .attach(fx.problem_id, PDF, "sol.pdf", "valid")
            .await
            .unwrap();

        let err = handler(identity(), &fx)
            .attach(fx.problem_id, PDF, "sol.pdf", "valid")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::PermissionDenied));
        assert_eq!(fx.store.problem(fx.problem_id).unwrap().pdf_url, first.pdf_url);
        assert_eq!(fx.blobs.len(), 1);
    }

    #[tokio::test]
    async fn test_gate_order_for_attach() {
        let owner = identity();
        let fx = fixture(&owner, "Echo");
        let handler = handler(owner, &fx);

        let err = handler
            .attach(Uuid::new_v4(), b"junk", "x.txt", "garbage")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ItemNotFound(_)));

        let err = handler
            .attach(fx.problem_id, b"junk", "x.txt", "garbage")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));

        let err = handler
            .attach(fx.problem_id, b"junk", "x.pdf", "valid")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidFile(_)));
        assert_eq!(fx.blobs.len(), 0);
    }

    #[tokio::test]
    async fn test_oversize_upload_still_reports_gates_first() {
        let owner = identity();
        let fx = fixture(&owner, "Echo");
        let handler = handler(owner, &fx);
        let big = vec![b'%'; LIMIT + 10];

        let err = handler
            .attach(Uuid::new_v4(), &big, "s.pdf", "garbage")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ItemNotFound(_)));

        let err = handler
            .attach(fx.problem_id, &big, "s.pdf", "garbage")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));

        let err = handler
            .attach(fx.problem_id, &big, "s.pdf", "valid")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidFile(_)));
    }

    #[tokio::test]
    async fn test_longest_title_fits_filesystem_name_limit() {
        let owner = identity();
        let fx = fixture(&owner, &"a".repeat(MAX_PROBLEM_TITLE_LENGTH as usize));
        let dir = tempfile::tempdir().unwrap();

        let handler = PdfAttachmentHandler::new(
            Arc::new(auth_accepting(owner)),
            Arc::new(creator_only()),
            Arc::new(fx.store.clone()),
            Arc::new(FsBlobStore::new(dir.path())),
            LIMIT,
        );

        let saved = handler
            .attach(fx.problem_id, PDF, "x.pdf", "valid")
            .await
            .unwrap();

        let name = saved.pdf_url.unwrap();
        assert!(name.len() <= 255);
        assert!(dir.path().join(&name).exists());
        assert_eq!(handler.fetch(fx.problem_id, "valid").await.unwrap().bytes, PDF);
    }

    #[tokio::test]
    async fn test_blob_write_failure_leaves_problem_untouched() {
        let owner = identity();
        let fx = fixture(&owner, "Echo");
        fx.blobs.fail_writes(true);
        let before = fx.store.problem(fx.problem_id).unwrap();

        let err = handler(owner, &fx)
            .attach(fx.problem_id, PDF, "sol.pdf", "valid")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(fx.store.problem(fx.problem_id).unwrap(), before);
    }

    #[tokio::test]
    async fn test_save_failure_removes_fresh_blob() {
        let owner = identity();
        let fx = fixture(&owner, "Echo");
        fx.store.fail_saves(true);

        let err = handler(owner, &fx)
            .attach(fx.problem_id, PDF, "sol.pdf", "valid")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(fx.blobs.len(), 0);
        assert_eq!(fx.store.problem(fx.problem_id).unwrap().pdf_url, None);
    }

    #[tokio::test]
    async fn test_reattach_replaces_previous_blob() {
        let owner = identity();
        let fx = fixture(&owner, "Echo");
        let handler = handler(owner, &fx);

        let first = handler
            .attach(fx.problem_id, PDF, "a.pdf", "valid")
            .await
            .unwrap()
            .pdf_url
            .unwrap();
        let second = handler
            .attach(fx.problem_id, PDF, "b.pdf", "valid")
            .await
            .unwrap()
            .pdf_url
            .unwrap();

        assert_ne!(first, second);
        assert!(!fx.blobs.contains(&first));
        assert!(fx.blobs.contains(&second));
    }

    #[tokio::test]
    async fn test_fetch_returns_stored_bytes() {
        let owner = identity();
        let fx = fixture(&owner, "Echo");
        let handler = handler(owner, &fx);

        let err = handler.fetch(fx.problem_id, "valid").await.unwrap_err();
        assert!(matches!(err, AppError::ItemNotFound(_)));

        handler
            .attach(fx.problem_id, PDF, "sol.pdf", "valid")
            .await
            .unwrap();
        let blob = handler.fetch(fx.problem_id, "valid").await.unwrap();
        assert_eq!(blob.bytes, PDF);

        let err = handler.fetch(fx.problem_id, "garbage").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[tokio::test]
    async fn test_fetch_missing_blob_is_not_found() {
        let owner = identity();
        let fx = fixture(&owner, "Echo");
        let mut problem = fx.store.problem(fx.problem_id).unwrap();
        problem.pdf_url = Some("gone_abcdefg.pdf".to_string());
        fx.store.seed_problem(problem);

        let err = handler(owner, &fx)
            .fetch(fx.problem_id, "valid")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ItemNotFound(_)));
    }
}
