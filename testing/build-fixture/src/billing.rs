use crate::audit::Audit;
use modelgen::dto_to_model;

#[dto_to_model(derive(Eq))]
pub struct InvoiceDto {
    pub id: u64,
    pub total_cents: u64,

    #[model_base]
    pub audit: Audit,
}

#[dto_to_model(name = "BillingData")]
pub struct BillingDataDto {
    pub(crate) account: String,

    #[ignore_in_model]
    pub card_number: String,
}

impl BillingDataDto {
    #[must_use]
    pub const fn new(account: String, card_number: String) -> Self {
        Self {
            account,
            card_number,
        }
    }
}

impl BillingData {
    #[must_use]
    pub fn account(&self) -> &str {
        &self.account
    }
}

modelgen::include_models!("billing.rs");
