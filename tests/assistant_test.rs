use std::sync::Arc;
use std::time::{Duration, Instant};

use delver::assistant::{Assistant, EngineMode, PollPolicy, Settings, poll_until_done};
use delver::bridge::Bridge;
use delver::session::{Role, Status};
use delver::workflow::mock::{MockWorkflow, ScriptedCall};
use delver::workflow::{ResearchConfig, Workflow, WorkflowOutput};

fn test_settings() -> Settings {
    Settings {
        writer_model: "gpt-4".to_string(),
        planner_model: "claude-3-sonnet".to_string(),
        search_depth: 2,
        max_sections: 5,
    }
}

fn fast_policy() -> PollPolicy {
    PollPolicy {
        max_wait: Duration::from_millis(80),
        interval: Duration::from_millis(30),
        nominal_duration: Duration::from_millis(200),
    }
}

fn build_assistant(mock: &Arc<MockWorkflow>, policy: PollPolicy) -> Assistant {
    let bridge = Bridge::new(Arc::clone(mock) as Arc<dyn Workflow>);
    Assistant::new(bridge, EngineMode::Live, test_settings(), policy)
}

#[tokio::test]
async fn full_cycle_logs_report_and_completes() {
    let mock = Arc::new(MockWorkflow::new(vec![ScriptedCall::Report(WorkflowOutput {
        final_report: "# Report\n\n## One\n\n## Two".to_string(),
        sections: Some(vec![
            delver::workflow::Section {
                name: "One".to_string(),
            },
            delver::workflow::Section {
                name: "Two".to_string(),
            },
        ]),
        source_str: None,
    })]));
    let mut assistant = build_assistant(&mock, fast_policy());

    assistant.research("tidal energy").await.unwrap();

    let session = assistant.session();
    assert_eq!(*session.status(), Status::Complete);
    assert_eq!(session.recent_topics(5), ["tidal energy"]);

    let messages = session.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].content, "tidal energy");
    assert_eq!(messages[1].role, Role::Assistant);
    assert!(messages[1].content.contains("# Report"));

    let metadata = messages[1].metadata.as_ref().unwrap();
    assert_eq!(metadata.sections_count, Some(2));
    assert_eq!(metadata.topic, "tidal energy");

    assert_eq!(assistant.totals().0, 1);
}

#[tokio::test]
async fn workflow_failure_completes_with_error_and_stays_usable() {
    let mock = Arc::new(MockWorkflow::new(vec![
        ScriptedCall::Fail("planner crashed".to_string()),
        ScriptedCall::Report(WorkflowOutput {
            final_report: "# Second try".to_string(),
            sections: None,
            source_str: None,
        }),
    ]));
    let mut assistant = build_assistant(&mock, fast_policy());

    assistant.research("first topic").await.unwrap();
    assert_eq!(*assistant.session().status(), Status::CompleteWithError);
    let messages = assistant.session().messages();
    assert!(messages[1].content.contains("planner crashed"));
    assert!(messages[1].metadata.is_none());

    // Every path leads back to a re-submittable state.
    assistant.research("second topic").await.unwrap();
    assert_eq!(*assistant.session().status(), Status::Complete);
    assert_eq!(assistant.session().messages().len(), 4);
}

#[tokio::test]
async fn timeout_logs_synthetic_entry_and_leaves_run_alive() {
    let mock = Arc::new(MockWorkflow::new(vec![ScriptedCall::Hang]));
    let mut assistant = build_assistant(&mock, fast_policy());

    let start = Instant::now();
    assistant.research("endless topic").await.unwrap();

    // Gave up a little after max_wait, not after some multiple of it.
    assert!(start.elapsed() < Duration::from_millis(500));
    assert_eq!(
        *assistant.session().status(),
        Status::Error("timeout".to_string())
    );

    let messages = assistant.session().messages();
    assert_eq!(messages.len(), 2);
    let metadata = messages[1].metadata.as_ref().unwrap();
    assert_eq!(metadata.error.as_deref(), Some("timeout"));
    assert_eq!(metadata.topic, "endless topic");

    // The background run was abandoned, not cancelled: it is still
    // in flight and finishes once the engine comes back.
    assert_eq!(mock.call_count(), 1);
    assert_eq!(mock.completed_count(), 0);
    mock.release();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(mock.completed_count(), 1);
}

#[tokio::test]
async fn two_interval_budget_polls_at_most_three_times() {
    let mock = Arc::new(MockWorkflow::new(vec![ScriptedCall::Hang]));
    let bridge = Bridge::new(Arc::clone(&mock) as Arc<dyn Workflow>);
    let handle = bridge.submit("endless", ResearchConfig::default()).unwrap();

    let policy = PollPolicy {
        max_wait: Duration::from_millis(100),
        interval: Duration::from_millis(50),
        nominal_duration: Duration::from_millis(200),
    };

    let mut polls = 0;
    let completed = poll_until_done(&handle, &policy, |_, _| polls += 1).await;

    assert!(!completed);
    assert!((1..=3).contains(&polls), "polled {polls} times");

    // Giving up never cancels the run.
    assert_eq!(mock.completed_count(), 0);
    mock.release();
    assert!(handle.wait_done(Duration::from_secs(1)).await);
}

#[tokio::test]
async fn interrupted_wait_is_bookkept_like_a_timeout() {
    let mock = Arc::new(MockWorkflow::new(vec![ScriptedCall::Hang]));
    // Budget long enough that the cycle is still waiting when dropped.
    let policy = PollPolicy {
        max_wait: Duration::from_secs(30),
        interval: Duration::from_millis(20),
        nominal_duration: Duration::from_millis(200),
    };
    let mut assistant = build_assistant(&mock, policy);

    // Mirror the REPL: the research future loses a select! race and is
    // dropped mid-wait, then the abandonment bookkeeping is applied.
    tokio::select! {
        _ = assistant.research("cut short") => panic!("hung research finished"),
        _ = tokio::time::sleep(Duration::from_millis(60)) => {}
    }
    assistant.abandon_wait("cut short");

    assert_eq!(
        *assistant.session().status(),
        Status::Error("interrupted".to_string())
    );
    let messages = assistant.session().messages();
    assert_eq!(messages.len(), 2);
    let metadata = messages[1].metadata.as_ref().unwrap();
    assert_eq!(metadata.error.as_deref(), Some("interrupted"));
    assert_eq!(metadata.topic, "cut short");

    // The abandoned run is still alive and finishes once released.
    assert_eq!(mock.completed_count(), 0);
    mock.release();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(mock.completed_count(), 1);
}

#[tokio::test]
async fn abandon_wait_is_a_noop_when_nothing_is_running() {
    let mock = Arc::new(MockWorkflow::single_report("# unused"));
    let mut assistant = build_assistant(&mock, fast_policy());

    assistant.abandon_wait("nothing running");

    assert!(assistant.session().messages().is_empty());
    assert_eq!(*assistant.session().status(), Status::AwaitingInput);
}

#[tokio::test]
async fn timeout_leaves_session_resubmittable() {
    let mock = Arc::new(MockWorkflow::new(vec![
        ScriptedCall::Hang,
        ScriptedCall::Report(WorkflowOutput {
            final_report: "# Finally".to_string(),
            sections: None,
            source_str: None,
        }),
    ]));
    let mut assistant = build_assistant(&mock, fast_policy());

    assistant.research("stuck one").await.unwrap();
    assert_eq!(
        *assistant.session().status(),
        Status::Error("timeout".to_string())
    );

    assistant.research("quick one").await.unwrap();
    assert_eq!(*assistant.session().status(), Status::Complete);
}

#[tokio::test]
async fn empty_topic_is_silently_ignored() {
    let mock = Arc::new(MockWorkflow::single_report("# unused"));
    let mut assistant = build_assistant(&mock, fast_policy());

    assistant.research("   ").await.unwrap();

    assert!(assistant.session().messages().is_empty());
    assert_eq!(assistant.session().topic_count(), 0);
    assert_eq!(*assistant.session().status(), Status::AwaitingInput);
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn settings_flow_into_the_submitted_config() {
    let settings = test_settings();
    let config = settings.to_config();
    assert_eq!(config.writer_model, "gpt-4");
    assert_eq!(config.planner_model, "claude-3-sonnet");
    assert_eq!(config.max_search_depth, 2);
    assert_eq!(config.max_sections, 5);

    // Each submission gets its own thread id.
    let other = settings.to_config();
    assert_ne!(config.thread_id, other.thread_id);
}
