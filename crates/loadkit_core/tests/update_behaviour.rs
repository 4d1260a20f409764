use std::sync::Once;

use loadkit_core::{
    update, Effect, FlattenStrategy, LoadError, LoaderOptions, LoaderState, LoadingState, Msg,
    PagedOutput, ViewLifetime,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(loadkit_logging::initialize_for_tests);
}

type State = LoaderState<i32, i32>;

fn states(effects: &[Effect<i32, i32>]) -> Vec<LoadingState<i32>> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::StateChanged(state) => Some(state.clone()),
            _ => None,
        })
        .collect()
}

fn loading_flags<I, O>(effects: &[Effect<I, O>]) -> Vec<bool> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::LoadingChanged(flag) => Some(*flag),
            _ => None,
        })
        .collect()
}

fn started(effects: &[Effect<i32, i32>]) -> Vec<(u64, Option<i32>)> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::StartLoad {
                generation, input, ..
            } => Some((*generation, *input)),
            _ => None,
        })
        .collect()
}

fn finished(generation: u64, result: Result<i32, LoadError>) -> Msg<i32, i32> {
    Msg::LoadFinished { generation, result }
}

#[test]
fn refresh_starts_a_load_and_success_completes_it() {
    init_logging();
    let state = State::new(LoaderOptions::manual());
    assert_eq!(state.state(), &LoadingState::Unloaded);

    let (state, effects) = update(state, Msg::Refresh(Some(15)));
    assert_eq!(
        effects,
        vec![
            Effect::LoadingChanged(true),
            Effect::StateChanged(LoadingState::Loading),
            Effect::StartLoad {
                generation: 1,
                input: Some(15),
                loaded: None,
            },
        ]
    );
    assert!(state.is_loading());
    assert_eq!(state.in_flight(), Some(1));

    let (state, effects) = update(state, finished(1, Ok(16)));
    assert_eq!(
        effects,
        vec![
            Effect::ContentLoaded(16),
            Effect::StateChanged(LoadingState::Success(16)),
            Effect::LoadingChanged(false),
        ]
    );
    assert_eq!(state.state(), &LoadingState::Success(16));
    assert_eq!(state.loaded(), Some(&16));
    assert_eq!(state.in_flight(), None);
}

#[test]
fn failure_yields_one_error_state_and_keeps_loaded_content() {
    init_logging();
    let state = State::new(LoaderOptions::manual());
    let (state, _) = update(state, Msg::Refresh(Some(1)));
    let (state, _) = update(state, finished(1, Ok(2)));

    let (state, effects) = update(state, Msg::Refresh(Some(-1)));
    assert_eq!(
        started(&effects),
        vec![(2, Some(-1))],
        "second load starts with the next generation"
    );
    let (state, effects) = update(state, finished(2, Err(LoadError::msg("negative input"))));

    assert_eq!(
        states(&effects),
        vec![LoadingState::Error(LoadError::msg("negative input"))]
    );
    assert_eq!(loading_flags(&effects), vec![false]);
    assert_eq!(state.loaded(), Some(&2));

    // Still ready for more requests.
    let (state, effects) = update(state, Msg::Refresh(None));
    assert_eq!(states(&effects), vec![LoadingState::Loading]);
    assert_eq!(state.generation(), 3);
}

#[test]
fn loading_flag_toggles_once_per_request() {
    init_logging();
    let state = State::new(LoaderOptions::manual());
    let mut flags = vec![state.is_loading()];

    let (state, effects) = update(state, Msg::Refresh(Some(0)));
    flags.extend(loading_flags(&effects));
    let (_state, effects) = update(state, finished(1, Err(LoadError::msg("boom"))));
    flags.extend(loading_flags(&effects));

    assert_eq!(flags, vec![false, true, false]);
}

#[test]
fn trigger_event_issues_refresh_without_input() {
    init_logging();
    let state = State::new(LoaderOptions::default());

    let (state, effects) = update(state, Msg::Lifetime(ViewLifetime::DidLoad));
    assert!(effects.is_empty());

    let (state, effects) = update(state, Msg::Lifetime(ViewLifetime::WillAppear));
    assert_eq!(started(&effects), vec![(1, None)]);
    assert!(state.is_loading());
}

#[test]
fn custom_trigger_is_honoured() {
    init_logging();
    let options = LoaderOptions::default().with_trigger(Some(ViewLifetime::DidAppear));
    let state = State::new(options);

    let (state, effects) = update(state, Msg::Lifetime(ViewLifetime::WillAppear));
    assert!(effects.is_empty());
    let (_state, effects) = update(state, Msg::Lifetime(ViewLifetime::DidAppear));
    assert_eq!(started(&effects), vec![(1, None)]);
}

#[test]
fn latest_request_wins_and_stale_results_are_discarded() {
    init_logging();
    let state = State::new(LoaderOptions::manual());
    let (state, _) = update(state, Msg::Refresh(Some(1)));

    let (state, effects) = update(state, Msg::Refresh(Some(2)));
    assert_eq!(
        effects,
        vec![
            Effect::CancelLoad { generation: 1 },
            Effect::StartLoad {
                generation: 2,
                input: Some(2),
                loaded: None,
            },
        ],
        "no repeated Loading state or loading flag while superseding"
    );

    let (state, effects) = update(state, finished(2, Ok(3)));
    assert_eq!(states(&effects), vec![LoadingState::Success(3)]);

    let (state, effects) = update(state, finished(1, Ok(2)));
    assert_eq!(effects, vec![Effect::Discarded { generation: 1 }]);
    assert_eq!(state.state(), &LoadingState::Success(3));
    assert_eq!(state.loaded(), Some(&3));
}

#[test]
fn stale_result_arriving_before_the_winner_is_discarded() {
    init_logging();
    let state = State::new(LoaderOptions::manual());
    let (state, _) = update(state, Msg::Refresh(Some(1)));
    let (state, _) = update(state, Msg::Refresh(Some(2)));

    let (state, effects) = update(state, finished(1, Ok(2)));
    assert_eq!(effects, vec![Effect::Discarded { generation: 1 }]);
    assert_eq!(state.state(), &LoadingState::Loading);
    assert!(state.is_loading());

    let (state, effects) = update(state, finished(2, Ok(3)));
    assert_eq!(states(&effects), vec![LoadingState::Success(3)]);
    assert!(!state.is_loading());
}

#[test]
fn concat_strategy_queues_requests_in_order() {
    init_logging();
    let options = LoaderOptions::manual().with_strategy(FlattenStrategy::Concat);
    let state = State::new(options);

    let (state, _) = update(state, Msg::Refresh(Some(1)));
    let (state, effects) = update(state, Msg::Refresh(Some(5)));
    assert!(effects.is_empty());
    assert_eq!(state.queued_len(), 1);

    let (state, effects) = update(state, finished(1, Ok(2)));
    assert_eq!(
        states(&effects),
        vec![LoadingState::Success(2), LoadingState::Loading]
    );
    assert_eq!(started(&effects), vec![(2, Some(5))]);
    assert!(
        loading_flags(&effects).is_empty(),
        "loading flag stays up between queued loads"
    );

    let (state, effects) = update(state, finished(2, Ok(6)));
    assert_eq!(states(&effects), vec![LoadingState::Success(6)]);
    assert_eq!(loading_flags(&effects), vec![false]);
    assert_eq!(state.queued_len(), 0);
}

#[test]
fn terminal_states_never_follow_each_other() {
    init_logging();
    let mut state = State::new(LoaderOptions::manual());
    let mut emitted = vec![state.state().clone()];
    let script: Vec<Msg<i32, i32>> = vec![
        Msg::Refresh(Some(1)),
        Msg::Refresh(Some(2)),
        finished(1, Ok(2)),
        finished(2, Ok(3)),
        finished(2, Ok(3)),
        Msg::Refresh(Some(-1)),
        finished(3, Err(LoadError::msg("negative"))),
        Msg::Refresh(None),
        finished(4, Ok(1)),
    ];
    for msg in script {
        let (next, effects) = update(state, msg);
        emitted.extend(states(&effects));
        state = next;
    }

    assert_eq!(
        emitted,
        vec![
            LoadingState::Unloaded,
            LoadingState::Loading,
            LoadingState::Success(3),
            LoadingState::Loading,
            LoadingState::Error(LoadError::msg("negative")),
            LoadingState::Loading,
            LoadingState::Success(1),
        ]
    );
    for pair in emitted.windows(2) {
        assert!(!(pair[0].is_terminal() && pair[1].is_terminal()));
    }
}

#[test]
fn list_outputs_without_items_are_empty() {
    init_logging();
    let state = LoaderState::<(), Vec<i32>>::for_list(LoaderOptions::manual());
    let (state, _) = update(state, Msg::Refresh(None));
    let (state, effects) = update(
        state,
        Msg::LoadFinished {
            generation: 1,
            result: Ok(Vec::new()),
        },
    );

    assert!(effects.contains(&Effect::ContentLoaded(Vec::new())));
    assert_eq!(state.state(), &LoadingState::Empty);
    assert_eq!(state.loaded(), Some(&Vec::new()));

    let (state, _) = update(state, Msg::Refresh(None));
    let (state, _) = update(
        state,
        Msg::LoadFinished {
            generation: 2,
            result: Ok(vec![7]),
        },
    );
    assert_eq!(state.state(), &LoadingState::Success(vec![7]));
}

#[test]
fn start_load_carries_the_loaded_content() {
    init_logging();
    let state = LoaderState::<bool, PagedOutput<char>>::for_list(LoaderOptions::manual());
    let (state, _) = update(state, Msg::Refresh(Some(false)));
    let page = PagedOutput::new(vec!['x', 'y'], true);
    let (state, _) = update(
        state,
        Msg::LoadFinished {
            generation: 1,
            result: Ok(page.clone()),
        },
    );

    let (_state, effects) = update(state, Msg::Refresh(Some(true)));
    assert!(effects.contains(&Effect::StartLoad {
        generation: 2,
        input: Some(true),
        loaded: Some(page),
    }));
}

#[test]
fn default_output_is_never_empty() {
    init_logging();
    let state = LoaderState::<(), Vec<i32>>::new(LoaderOptions::manual());
    let (state, _) = update(state, Msg::Refresh(None));
    let (state, _) = update(
        state,
        Msg::LoadFinished {
            generation: 1,
            result: Ok(Vec::new()),
        },
    );
    assert_eq!(state.state(), &LoadingState::Success(Vec::new()));
}
