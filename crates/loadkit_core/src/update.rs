use crate::{Effect, LoaderState, Msg};

/// Pure update function: applies a message to a loader's state and returns
/// the effects to carry out, in order.
pub fn update<I: Clone, O: Clone>(
    mut state: LoaderState<I, O>,
    msg: Msg<I, O>,
) -> (LoaderState<I, O>, Vec<Effect<I, O>>) {
    let mut effects = Vec::new();
    match msg {
        Msg::Refresh(input) => state.request(input, &mut effects),
        Msg::Lifetime(event) => {
            if state.options().trigger == Some(event) {
                state.request(None, &mut effects);
            }
        }
        Msg::LoadFinished { generation, result } => {
            state.finish(generation, result, &mut effects);
        }
    }

    (state, effects)
}
