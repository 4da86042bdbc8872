use modelgen::dto_to_model;

#[dto_to_model]
pub struct TestDto {
    #[ignore_in_model]
    pub id: String,
    pub name: String,
    pub surname: String,
}

modelgen::include_models!("ignored.rs");
