use modelgen::dto_to_model;

///
/// Audit
/// shared bookkeeping embedded by several DTOs
///

#[dto_to_model(name = "AuditRecord")]
#[derive(Clone, Debug)]
pub struct Audit {
    pub created_by: String,
    pub revision: u32,

    #[ignore_in_model]
    pub session_token: String,
}

modelgen::include_models!("audit.rs");
