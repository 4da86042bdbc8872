use modelgen::dto_to_model;

#[dto_to_model(name = "MyModel")]
pub struct TestDto {
    pub id: String,
    pub name: String,
    pub surname: String,
}

modelgen::include_models!("custom.rs");
