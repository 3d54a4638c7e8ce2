#[cfg(test)]
mod playback {
    use api_smoke::{
        all_posts, get_request, post_request, run_suite, Error, NonPersistencePolicy, Outcome,
        PostsClient, SmokeCase, SmokeConfiguration,
    };
    use smoke_playback::playback_test;

    fn configure(_config: &mut SmokeConfiguration) {}

    fn reject_non_persistence(config: &mut SmokeConfiguration) {
        config.set_tolerate_non_persistence(false);
    }

    fn run_in_parallel(config: &mut SmokeConfiguration) {
        config.set_parallel(true);
    }

    fn client(config: &SmokeConfiguration) -> PostsClient {
        PostsClient::from_configuration(config).unwrap()
    }

    fn assertion_check(result: Result<Outcome, Error>) -> String {
        match result {
            Err(Error::AssertionFailed(failure)) => failure.check,
            other => panic!("Expected an assertion failure, got {:?}", other),
        }
    }

    #[playback_test("playback_data/get_post.md", configure)]
    fn get_request_passes(config: SmokeConfiguration) {
        assert_eq!(get_request(&client(&config)).unwrap(), Outcome::Passed);
    }

    #[playback_test("playback_data/get_post_wrong_content_type.md", configure)]
    fn get_request_requires_exact_content_type(config: SmokeConfiguration) {
        assert_eq!(
            assertion_check(get_request(&client(&config))),
            "content-type header"
        );
    }

    #[playback_test("playback_data/all_posts.md", configure)]
    fn all_posts_passes(config: SmokeConfiguration) {
        assert_eq!(all_posts(&client(&config)).unwrap(), Outcome::Passed);
    }

    #[playback_test("playback_data/all_posts_empty.md", configure)]
    fn all_posts_rejects_empty_list(config: SmokeConfiguration) {
        assert_eq!(assertion_check(all_posts(&client(&config))), "array length");
    }

    #[playback_test("playback_data/create_post_not_persisted.md", configure)]
    fn post_request_tolerates_missing_lookup(config: SmokeConfiguration) {
        let outcome = post_request(&client(&config), config.non_persistence_policy()).unwrap();

        assert_eq!(
            outcome,
            Outcome::Tolerated("post 101 was not found after creation".to_string())
        );
    }

    #[playback_test("playback_data/create_post_not_persisted.md", reject_non_persistence)]
    fn post_request_rejects_missing_lookup_when_strict(config: SmokeConfiguration) {
        assert_eq!(config.non_persistence_policy(), NonPersistencePolicy::Reject);

        match post_request(&client(&config), config.non_persistence_policy()) {
            Err(Error::AssertionFailed(failure)) => {
                assert_eq!(failure.check, "status code");
                assert_eq!(failure.expected, "200");
                assert_eq!(failure.actual, "404");
            }
            other => panic!("Expected the 404 to fail the case, got {:?}", other),
        }
    }

    #[playback_test("playback_data/create_post_persisted.md", reject_non_persistence)]
    fn post_request_reads_back_persisted_post(config: SmokeConfiguration) {
        let outcome = post_request(&client(&config), config.non_persistence_policy()).unwrap();

        assert_eq!(outcome, Outcome::Passed);
    }

    #[playback_test("playback_data/create_post_lookup_mismatch.md", configure)]
    fn post_request_rejects_lookup_of_another_post(config: SmokeConfiguration) {
        assert_eq!(
            assertion_check(post_request(
                &client(&config),
                config.non_persistence_policy()
            )),
            "body"
        );
    }

    #[playback_test("playback_data/create_post_string_id.md", configure)]
    fn post_request_looks_up_numeric_string_id(config: SmokeConfiguration) {
        let outcome = post_request(&client(&config), config.non_persistence_policy()).unwrap();

        assert_eq!(
            outcome,
            Outcome::Tolerated("post 101 was not found after creation".to_string())
        );
    }

    #[playback_test("playback_data/repeated_reads.md", configure)]
    fn repeated_reads_give_the_same_outcome(config: SmokeConfiguration) {
        let client = client(&config);

        for _ in 0..2 {
            assert_eq!(get_request(&client).unwrap(), Outcome::Passed);
            assert_eq!(all_posts(&client).unwrap(), Outcome::Passed);
        }
    }

    #[playback_test("playback_data/full_suite.md", configure)]
    fn suite_runs_sequentially(config: SmokeConfiguration) {
        let report = run_suite(&config).unwrap();

        assert!(report.passed(), "{}", report);
        assert_eq!(
            report.cases().iter().map(|case| case.case).collect::<Vec<_>>(),
            SmokeCase::ALL.to_vec()
        );
        assert!(matches!(
            report.case(SmokeCase::PostRequest).unwrap().result,
            Ok(Outcome::Tolerated(_))
        ));
    }

    #[playback_test("playback_data/full_suite.md", run_in_parallel)]
    fn suite_runs_in_parallel(config: SmokeConfiguration) {
        let report = run_suite(&config).unwrap();

        assert!(report.passed(), "{}", report);
        assert_eq!(report.exit_code(), 0);
        assert_eq!(
            report.cases().iter().map(|case| case.case).collect::<Vec<_>>(),
            SmokeCase::ALL.to_vec()
        );
    }
}

/// Runs against the configured live service (the public mock API unless `smoke.toml` or
/// `SMOKE_BASE_URL` says otherwise): `cargo test -- --ignored`.
#[cfg(test)]
mod live {
    use api_smoke::{all_posts, get_request, post_request, Outcome, PostsClient, SmokeConfiguration};

    fn configuration() -> SmokeConfiguration {
        SmokeConfiguration::load().unwrap()
    }

    #[test]
    #[ignore = "hits the network"]
    fn get_request_live() {
        let client = PostsClient::from_configuration(&configuration()).unwrap();

        assert_eq!(get_request(&client).unwrap(), Outcome::Passed);
    }

    #[test]
    #[ignore = "hits the network"]
    fn all_posts_live() {
        let client = PostsClient::from_configuration(&configuration()).unwrap();

        assert_eq!(all_posts(&client).unwrap(), Outcome::Passed);
    }

    #[test]
    #[ignore = "hits the network"]
    fn post_request_live() {
        let configuration = configuration();
        let client = PostsClient::from_configuration(&configuration).unwrap();

        post_request(&client, configuration.non_persistence_policy()).unwrap();
    }
}
