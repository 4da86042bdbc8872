use modelgen::dto_to_model;

struct Audit {
    created_by: String,
}

// models for marked structs come from the build script; on its own the
// attribute validates the struct and strips the member markers
#[dto_to_model(name = "InvoiceModel", derive(Debug))]
struct InvoiceDto {
    id: u64,
    #[ignore_in_model]
    secret: String,
    #[model_base]
    audit: Audit,
}

fn main() {
    let dto = InvoiceDto {
        id: 1,
        secret: String::new(),
        audit: Audit {
            created_by: "ada".into(),
        },
    };
    assert_eq!(dto.id, 1);
    assert!(dto.secret.is_empty());
    assert_eq!(dto.audit.created_by, "ada");
}
