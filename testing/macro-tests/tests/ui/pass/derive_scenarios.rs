use modelgen::DtoToModel;

#[derive(DtoToModel)]
pub struct TestDto {
    pub id: String,
    #[ignore_in_model]
    pub token: String,
}

#[derive(DtoToModel)]
#[dto_model(name = "Account", derive(Clone, Debug))]
pub struct AccountPayload {
    pub id: u64,
    pub(crate) owner: String,
}

fn main() {
    let model: TestModel = TestDto {
        id: "1".into(),
        token: "secret".into(),
    }
    .to_test_model();
    assert_eq!(model.id, "1");

    let account = Account::from(AccountPayload {
        id: 1,
        owner: "ada".into(),
    });
    let _copy = account.clone();
    assert_eq!(account.owner, "ada");
}
