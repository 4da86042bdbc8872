use modelgen::dto_to_model;

#[dto_to_model]
pub struct TestData {
    pub id: String,
    pub name: String,
    pub surname: String,
}

modelgen::include_models!("data.rs");
