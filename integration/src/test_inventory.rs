//! Defines types and utilities for managing the inventory of integration tests

use eyre::Result;
use scripts::{chain::RpcClient, session::Session};
use std::{future::Future, pin::Pin, rc::Rc};
use tokio::sync::Mutex;

/// The arguments provided to each integration test
#[derive(Clone)]
pub struct TestArgs {
    /// The session shared by every test, so contracts deployed by one test are
    /// visible to the next
    pub session: Rc<Mutex<Session<RpcClient>>>,
}

impl TestArgs {
    /// Wrap a session for sharing between tests
    pub fn new(session: Session<RpcClient>) -> Self {
        Self {
            session: Rc::new(Mutex::new(session)),
        }
    }
}

/// The signature of an integration test
type TestFn = fn(TestArgs) -> Pin<Box<dyn Future<Output = Result<()>>>>;

/// A struct representing an integration test
pub struct IntegrationTest {
    /// The name of the test
    pub name: &'static str,
    /// The test function
    pub test_fn: TestFn,
}

// Collect the integration tests into an iterable
inventory::collect!(IntegrationTest);

/// Macro to register an integration test
#[macro_export]
macro_rules! integration_test {
    ($test_fn:ident) => {
        inventory::submit!($crate::test_inventory::IntegrationTest {
            name: stringify!($test_fn),
            test_fn: move |args| std::boxed::Box::pin($test_fn(args)),
        });
    };
}
