// src/core/dispatch.rs

//! Selects the eligible actions of a parsed command and runs them in registration order.

use crate::{
    core::{
        action::{Action, Handler, HandlerResult},
        command::Command,
        error::CmdError,
        params::ParsedState,
    },
    models::Flow,
};

/// The actions whose requirement is met by `state`, in registration order.
pub fn select(actions: &[Action], state: &ParsedState) -> Vec<Action> {
    actions
        .iter()
        .filter(|action| action.is_eligible(state))
        .cloned()
        .collect()
}

/// Runs the eligible actions of `command` one after another.
///
/// Each handler gets its declared parameters injected from the live parameter map, so a
/// value written by one handler is visible to the next. Async handlers are awaited before
/// the next one starts. `Flow::Stop` or an error ends the run; errors go to the sink.
/// There is no timeout: a handler that never completes stalls the dispatch.
pub async fn run(command: &Command) {
    let (actions, state) = command.actions_and_state();
    let eligible = select(&actions, &state);
    log::debug!(
        "{} of {} action(s) eligible for '{}'",
        eligible.len(),
        actions.len(),
        state.name().unwrap_or_default()
    );
    if eligible.is_empty() {
        no_processing(command).await;
        return;
    }

    for action in &eligible {
        match invoke(command, action).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Stop) => {
                log::debug!("Action stopped further dispatch");
                break;
            }
            Err(e) => {
                command.emit_error(&CmdError::Action(e));
                break;
            }
        }
    }
}

/// Injects the declared parameters of `action` from the live map and runs its handler.
async fn invoke(command: &Command, action: &Action) -> HandlerResult {
    let args = command.inject(action.params());
    match action.handler() {
        Handler::Sync(handler) => handler(args),
        Handler::Async(handler) => handler(args).await,
        Handler::Text(text) => {
            command.print(text);
            Ok(Flow::Stop)
        }
    }
}

/// Runs the help action when one is configured, otherwise reports `NoProcessing`.
async fn no_processing(command: &Command) {
    match command.help_action() {
        Some(help) => {
            if let Err(e) = invoke(command, &help).await {
                command.emit_error(&CmdError::Action(e));
            }
        }
        None => command.emit_error(&CmdError::NoProcessing),
    }
}
