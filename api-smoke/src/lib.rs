mod checks;
mod configuration;
mod data;
mod error;
mod posts_client;
mod report;
mod suite;

pub use checks::{
    expect_body_contains, expect_header, expect_non_empty_array, expect_non_empty_body,
    expect_status,
};
pub use configuration::{NonPersistencePolicy, SmokeConfiguration, DEFAULT_BASE_URL};
pub use data::{Post, ResponseData};
pub use error::{AssertionFailure, Error};
pub use posts_client::{PostsClient, PostsClientBuilder};
pub use report::{CaseReport, SuiteReport};
pub use suite::{all_posts, get_request, post_request, run_case, run_suite, Outcome, SmokeCase};
