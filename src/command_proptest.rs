//! Property-based tests for helm command compilation and placeholder
//! resolution.
//!
//! These tests use proptest to generate random configurations and verify
//! that the argument-list invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::command::{compile, help_command, EventKind};
    use crate::config::Config;
    use crate::env::resolve_with;
    use proptest::prelude::*;

    /// Tokens that never collide with flag names
    fn token() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9./-]{0,12}"
    }

    /// Chart names are uppercase so no other generated token can equal one
    fn chart_token() -> impl Strategy<Value = String> {
        "[A-Z][A-Z0-9./-]{0,12}"
    }

    fn optional_token() -> impl Strategy<Value = String> {
        prop_oneof![Just(String::new()), token()]
    }

    fn deploy_event() -> impl Strategy<Value = EventKind> {
        prop_oneof![
            Just(EventKind::Push),
            Just(EventKind::Tag),
            Just(EventKind::Deployment),
        ]
    }

    prop_compose! {
        fn config()(
            release in optional_token(),
            chart in chart_token(),
            version in optional_token(),
            namespace in optional_token(),
            tiller_ns in optional_token(),
            timeout in optional_token(),
            flags in proptest::array::uniform6(any::<bool>()),
        ) -> Config {
            Config {
                release,
                chart,
                version,
                namespace,
                tiller_ns,
                timeout,
                dry_run: flags[0],
                debug: flags[1],
                wait: flags[2],
                recreate_pods: flags[3],
                reuse_values: flags[4],
                force: flags[5],
                ..Default::default()
            }
        }
    }

    // ============================================================================
    // compile property tests
    // ============================================================================

    proptest! {
        /// Property: deploy events always start with `upgrade --install`
        #[test]
        fn deploy_events_start_with_upgrade_install(event in deploy_event(), config in config()) {
            let cmd = compile(&event, &config);
            prop_assert_eq!(&cmd.args()[0], "upgrade");
            prop_assert_eq!(&cmd.args()[1], "--install");
        }

        /// Property: the chart appears exactly once, right after the release
        /// when there is one
        #[test]
        fn chart_follows_release(event in deploy_event(), config in config()) {
            let cmd = compile(&event, &config);
            let args = cmd.args();

            prop_assert_eq!(args.iter().filter(|a| **a == config.chart).count(), 1);

            if config.release.is_empty() {
                prop_assert_eq!(&args[2], &config.chart);
            } else {
                prop_assert_eq!(&args[2], &config.release);
                prop_assert_eq!(&args[3], &config.chart);
            }
        }

        /// Property: unset fields never leave a flag or an empty token behind
        #[test]
        fn unset_fields_leave_no_trace(event in deploy_event(), config in config()) {
            let cmd = compile(&event, &config);
            let has = |flag: &str| cmd.args().iter().any(|a| a == flag);

            prop_assert_eq!(has("--namespace"), !config.namespace.is_empty());
            prop_assert_eq!(has("--version"), !config.version.is_empty());
            prop_assert_eq!(has("--tiller-namespace"), !config.tiller_ns.is_empty());
            prop_assert_eq!(has("--timeout"), !config.timeout.is_empty());
            prop_assert_eq!(has("--dry-run"), config.dry_run);
            prop_assert_eq!(has("--wait"), config.wait);
            prop_assert_eq!(has("--force"), config.force);
            prop_assert!(!has("--set"));
            prop_assert!(!has(""));
        }

        /// Property: delete is always exactly `delete <release>`
        #[test]
        fn delete_is_two_tokens(config in config()) {
            let cmd = compile(&EventKind::Delete, &config);
            prop_assert_eq!(cmd.args().to_vec(), vec!["delete".to_string(), config.release.clone()]);
        }

        /// Property: any unrecognized event compiles to help
        #[test]
        fn other_events_are_help(event in "[a-z_]{0,12}", config in config()) {
            prop_assume!(!["push", "tag", "deployment", "delete"].contains(&event.as_str()));
            let cmd = compile(&EventKind::classify(&event), &config);
            prop_assert_eq!(cmd, help_command());
        }
    }

    // ============================================================================
    // resolve property tests
    // ============================================================================

    proptest! {
        /// Property: strings without `$` pass through untouched
        #[test]
        fn resolve_without_dollar_is_identity(input in "[^$]*", prefix in "[a-z]{0,6}") {
            let resolved = resolve_with(&input, &prefix, false, |_| Some("x".to_string()));
            prop_assert_eq!(resolved, input);
        }

        /// Property: no braced placeholder survives resolution
        #[test]
        fn resolve_replaces_every_braced_placeholder(
            names in proptest::collection::vec("[A-Z][A-Z0-9_]{0,8}", 1..5),
        ) {
            let template: String = names.iter().map(|n| format!("<${{{}}}>", n)).collect();
            let resolved = resolve_with(&template, "px", false, |_| None);
            prop_assert!(!resolved.contains('$'));
            prop_assert_eq!(resolved, "<>".repeat(names.len()));
        }
    }
}
