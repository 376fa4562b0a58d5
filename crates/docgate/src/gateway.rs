//! The access-controlled document gateway.
//!
//! Every operation follows the same flow:
//!
//! ```text
//! transport metadata ──► NetworkClassifier ──► NetworkContext
//!                                                   │
//! (item ops) store.fetch ──► GroupAccessResolver ───┤
//!                                                   ▼
//!                                           ContextAssembler
//!                                                   │
//!                                                   ▼
//!                                  DecisionEngine ──► allow / deny
//! ```
//!
//! Listing authorizes once at collection level and then lets the store apply
//! the [`VisibilityScope`] instead of deciding per row.

use chrono::Utc;
use docgate_abac::{DecisionEngine, DecisionRequest};
use docgate_network::{NetworkClassifier, NetworkContext, TransportMetadata};
use docgate_rbac::VisibilityScope;
use docgate_store::{AssociationStore, DocumentStore};
use docgate_types::{Action, Document, DocumentId, DocumentInput, Principal};
use tracing::{info, warn};
use uuid::Uuid;

use crate::access::GroupAccessResolver;
use crate::context::ContextAssembler;
use crate::error::{GatewayError, Result};

/// Caller identity and transport metadata for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub principal: Principal,
    pub transport: TransportMetadata,
}

impl RequestContext {
    pub fn new(principal: Principal, transport: TransportMetadata) -> Self {
        Self {
            principal,
            transport,
        }
    }
}

/// Document operations guarded by attribute-based access control.
pub struct Gateway<S, E> {
    store: S,
    engine: E,
    classifier: NetworkClassifier,
    assembler: ContextAssembler,
}

impl<S, E> Gateway<S, E>
where
    S: DocumentStore + AssociationStore,
    E: DecisionEngine,
{
    /// Creates a gateway with the default classifier.
    pub fn new(store: S, engine: E) -> Self {
        Self {
            store,
            engine,
            classifier: NetworkClassifier::default(),
            assembler: ContextAssembler,
        }
    }

    /// Replaces the network classifier (builder pattern).
    pub fn with_classifier(mut self, classifier: NetworkClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn classifier(&self) -> &NetworkClassifier {
        &self.classifier
    }

    // ========================================================================
    // Collection operations
    // ========================================================================

    /// Lists every document visible to the caller, newest first.
    pub fn list_documents(&self, ctx: &RequestContext) -> Result<Vec<Document>> {
        let network = self.classify(ctx);
        let request = self
            .assembler
            .collection(&ctx.principal, Action::ListDocuments, network)?;
        self.authorize(&request)?;

        let scope =
            VisibilityScope::for_principal(ctx.principal.role, ctx.principal.group.as_ref());
        Ok(self.store.list(&scope)?)
    }

    /// Creates an ungrouped document owned by the caller.
    pub fn create_document(&self, ctx: &RequestContext, input: DocumentInput) -> Result<Document> {
        let network = self.classify(ctx);
        let request = self
            .assembler
            .collection(&ctx.principal, Action::CreateDocument, network)?;
        self.authorize(&request)?;

        let id = DocumentId::new(format!("doc-{}", Uuid::new_v4()));
        let document = Document::new(id, ctx.principal.id.clone(), input, Utc::now());
        let document = self.store.insert(document)?;

        info!(
            principal = %ctx.principal.id,
            document = %document.id,
            "Document created"
        );
        Ok(document)
    }

    // ========================================================================
    // Item operations
    // ========================================================================

    /// Returns one document if the caller may read it.
    pub fn get_document(&self, ctx: &RequestContext, id: &DocumentId) -> Result<Document> {
        self.authorize_item(ctx, Action::GetDocument, id)
    }

    /// Replaces a document's title and content.
    pub fn update_document(
        &self,
        ctx: &RequestContext,
        id: &DocumentId,
        input: DocumentInput,
    ) -> Result<Document> {
        self.authorize_item(ctx, Action::UpdateDocument, id)?;

        self.store
            .update(id, input, Utc::now())?
            .ok_or_else(|| GatewayError::NotFound(id.clone()))
    }

    /// Deletes a document.
    pub fn delete_document(&self, ctx: &RequestContext, id: &DocumentId) -> Result<()> {
        self.authorize_item(ctx, Action::DeleteDocument, id)?;

        if self.store.delete(id)? {
            info!(principal = %ctx.principal.id, document = %id, "Document deleted");
            Ok(())
        } else {
            Err(GatewayError::NotFound(id.clone()))
        }
    }

    // ========================================================================
    // Decision plumbing
    // ========================================================================

    fn classify(&self, ctx: &RequestContext) -> NetworkContext {
        self.classifier.classify_request(&ctx.transport)
    }

    /// Fetches a document, resolves group access and authorizes `action` on it.
    fn authorize_item(
        &self,
        ctx: &RequestContext,
        action: Action,
        id: &DocumentId,
    ) -> Result<Document> {
        let network = self.classify(ctx);

        let document = self
            .store
            .fetch(id)?
            .ok_or_else(|| GatewayError::NotFound(id.clone()))?;

        let has_group_access = GroupAccessResolver::new(&self.store).has_access(
            ctx.principal.group.as_ref(),
            document.group_id.as_ref(),
        );

        let request =
            self.assembler
                .item(&ctx.principal, action, &document, has_group_access, network)?;
        self.authorize(&request)?;

        Ok(document)
    }

    /// Evaluates a request. Anything but an explicit allow is `Forbidden`.
    fn authorize(&self, request: &DecisionRequest) -> Result<()> {
        let principal = &request.principal().id;
        let action = request.action();
        let client = &request.context().network.ip_address;

        let decision = match self.engine.evaluate(request) {
            Ok(decision) => decision,
            Err(e) => {
                warn!(
                    principal = %principal,
                    action = %action,
                    client = %client,
                    error = %e,
                    "Decision engine failed; denying"
                );
                return Err(GatewayError::Forbidden {
                    reason: format!("decision unavailable: {e}"),
                });
            }
        };

        let rule = decision.matched_rule.as_deref().unwrap_or("<default>");
        if decision.is_authorized() {
            info!(
                principal = %principal,
                action = %action,
                client = %client,
                rule = %rule,
                "Access granted"
            );
            Ok(())
        } else {
            warn!(
                principal = %principal,
                action = %action,
                client = %client,
                rule = %rule,
                kind = %decision.kind(),
                "Access denied"
            );
            Err(GatewayError::Forbidden {
                reason: decision.reason,
            })
        }
    }
}
