//! Store tests on both backends
//!
//! `contract` holds the behaviour every backend must share. The memory
//! runner always executes it; the PostgreSQL runner needs `DATABASE_URL`.

/// One `#[tokio::test]` per contract function, on the store built by `$store`
///
/// `$store` is evaluated inside each test and yields `Option<Store>`; `None`
/// skips the test.
macro_rules! store_contract_tests {
    ($store:expr; $($name:ident),+ $(,)?) => {
        $(
            #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
            async fn $name() {
                let Some(store) = $store else {
                    return;
                };
                crate::integration::database::contract::$name(&store).await;
            }
        )+
    };
}

pub(crate) use store_contract_tests;

pub mod memory_test;
pub mod migrations_test;
pub mod postgres_test;
