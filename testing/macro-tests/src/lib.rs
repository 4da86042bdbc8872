//! Derive-host fixtures, one per documented scenario.

pub mod scenarios {
    use modelgen::DtoToModel;

    ///
    /// TestDto
    /// default name
    ///

    #[derive(Clone, Debug, DtoToModel)]
    #[dto_model(derive(Clone, Debug, PartialEq, Eq))]
    pub struct TestDto {
        pub id: String,
        pub name: String,
        pub surname: String,
    }

    ///
    /// CustomDto
    /// explicit name
    ///

    #[derive(DtoToModel)]
    #[dto_model(name = "MyModel", derive(Debug, PartialEq, Eq))]
    pub struct CustomDto {
        pub id: String,
        pub name: String,
        pub surname: String,
    }

    ///
    /// TestData
    /// no `Dto` in the name
    ///

    #[derive(DtoToModel)]
    #[dto_model(derive(Debug))]
    pub struct TestData {
        pub id: String,
        pub name: String,
        pub surname: String,
    }

    ///
    /// SecretDto
    /// an ignored field
    ///

    #[derive(DtoToModel)]
    #[dto_model(derive(Debug, PartialEq, Eq))]
    pub struct SecretDto {
        #[ignore_in_model]
        pub id: String,
        pub name: String,
        pub surname: String,
    }

    ///
    /// PrivateDto
    /// private fields keep their visibility
    ///

    #[derive(DtoToModel)]
    pub struct PrivateDto {
        id: u64,
        /// Shown to users.
        pub label: String,
    }

    impl PrivateDto {
        #[must_use]
        pub const fn new(id: u64, label: String) -> Self {
            Self { id, label }
        }
    }

    impl PrivateModel {
        #[must_use]
        pub const fn id(&self) -> u64 {
            self.id
        }
    }
}
