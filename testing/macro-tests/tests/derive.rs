use modelgen_macro_tests::scenarios::*;

fn names() -> (String, String, String) {
    ("1".to_string(), "Ada".to_string(), "Lovelace".to_string())
}

#[test]
fn default_name_copies_every_field() {
    let (id, name, surname) = names();
    let dto = TestDto {
        id: id.clone(),
        name: name.clone(),
        surname: surname.clone(),
    };

    let model: TestModel = dto.clone().to_test_model();
    assert_eq!(model, TestModel::new(id, name, surname));
    assert_eq!(TestModel::from(dto), model);
}

#[test]
fn explicit_name_is_used() {
    let (id, name, surname) = names();
    let model = CustomDto { id, name, surname }.to_my_model();

    assert_eq!(model.name, "Ada");
    assert_eq!(model, MyModel::new("1".into(), "Ada".into(), "Lovelace".into()));
}

#[test]
fn suffix_is_appended_without_dto() {
    let (id, name, surname) = names();
    let model = TestData { id, name, surname }.to_test_data_model();

    assert_eq!(model.surname, "Lovelace");
}

#[test]
fn ignored_field_is_left_out() {
    let (id, name, surname) = names();
    let model = SecretDto { id, name, surname }.to_secret_model();

    assert_eq!(model, SecretModel::new("Ada".into(), "Lovelace".into()));
}

#[test]
fn private_fields_are_forwarded() {
    let model: PrivateModel = PrivateDto::new(7, "seven".into()).into();

    assert_eq!(model.id(), 7);
    assert_eq!(model.label, "seven");
}
