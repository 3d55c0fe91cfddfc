#![allow(clippy::unwrap_used)]

use super::*;
use pretty_assertions::assert_eq;

use crate::errors::EvalErrorKind;

fn chain() -> (Rc<Context>, Rc<Context>) {
    let runtime = Rc::new(Runtime::new(HandlerContainer::default(), Debugger::new()));
    let api = Context::root("main.src", runtime);
    let global = api.fork(ContextKind::Global, ContextState::Default);
    (api, global)
}

fn get(ctx: &Context, path: &str) -> Value {
    ctx.get(&Path::parse(path)).unwrap()
}

fn set(ctx: &Context, path: &str, value: impl Into<Value>) {
    ctx.set(&Path::parse(path), value.into()).unwrap();
}

#[test]
fn ancestors_are_tracked_by_kind() {
    let (api, global) = chain();
    let function = global.fork(ContextKind::Function, ContextState::Default);
    let inner = function.fork(ContextKind::Loop, ContextState::Temporary);

    assert!(std::ptr::eq(inner.api().unwrap(), &*api));
    assert!(std::ptr::eq(inner.globals().unwrap(), &*global));
    assert!(std::ptr::eq(inner.locals(), &*function));
    assert!(std::ptr::eq(global.locals(), &*global));
    assert!(api.globals().is_none());
}

#[test]
fn fork_inherits_target_and_injection() {
    let (_, global) = chain();
    let import = global.fork_with(
        ContextKind::External,
        ContextState::Temporary,
        Some(Rc::from("lib/util.src")),
        None,
    );
    let injected = import.fork_with(ContextKind::Call, ContextState::Temporary, None, Some(true));

    assert_eq!(&**global.target(), "main.src");
    assert_eq!(&**injected.target(), "lib/util.src");
    assert!(injected.is_injected());
    assert!(!import.is_injected());
    assert_eq!(injected.kind(), ContextKind::Call);
}

#[test]
fn temporary_frames_write_through() {
    let (_, global) = chain();
    let loop_ctx = global.fork(ContextKind::Loop, ContextState::Temporary);
    set(&loop_ctx, "i", 3);

    assert!(loop_ctx.scope().borrow().is_empty());
    assert_eq!(get(&global, "i"), Value::from(3));
    assert_eq!(get(&loop_ctx, "i"), Value::from(3));
}

#[test]
fn function_frames_shadow_globals() {
    let (_, global) = chain();
    set(&global, "x", 1);
    let function = global.fork(ContextKind::Function, ContextState::Default);
    assert_eq!(get(&function, "x"), Value::from(1));

    set(&function, "x", 2);
    assert_eq!(get(&function, "x"), Value::from(2));
    assert_eq!(get(&global, "x"), Value::from(1));

    set(&function, "globals.y", 5);
    assert_eq!(get(&global, "y"), Value::from(5));
    assert_eq!(get(&function, "locals.x"), Value::from(2));
}

#[test]
fn api_bindings_are_visible_everywhere() {
    let (api, global) = chain();
    api.extend([("answer".to_string(), Value::from(42))]);
    let function = global.fork(ContextKind::Function, ContextState::Default);
    assert_eq!(get(&function, "answer"), Value::from(42));
}

#[test]
fn bare_map_intrinsics_resolve() {
    let (_, global) = chain();
    let keys = get(&global, "keys");
    assert!(matches!(keys, Value::Function(ref f) if f.name() == "keys"));
}

#[test]
fn missing_path_is_an_error() {
    let (_, global) = chain();
    let err = global.get(&Path::single("nope")).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::CannotGetPath { path: "nope".to_string() });
}

#[test]
fn nested_reads_through_values() {
    let (_, global) = chain();
    let mut point = ScriptMap::new();
    point.insert("x", Value::from(1));
    set(&global, "p", point);
    set(&global, "p.y", 2);
    assert_eq!(get(&global, "p.y"), Value::from(2));
}

#[test]
fn control_state_scoping() {
    let (_, global) = chain();
    assert!(global.loop_state().is_none());
    assert!(global.function_state().is_none());

    let function = global.fork(ContextKind::Function, ContextState::Default);
    let loop_ctx = function.fork(ContextKind::Loop, ContextState::Temporary);
    let branch = loop_ctx.fork(ContextKind::Call, ContextState::Temporary);

    branch.loop_state().unwrap().set_break(true);
    assert!(loop_ctx.loop_state().unwrap().is_break());

    branch.function_state().unwrap().finish(Value::from(7));
    assert!(function.function_state().unwrap().is_return());
    assert_eq!(function.function_state().unwrap().value(), Value::from(7));

    let nested = branch.fork(ContextKind::Function, ContextState::Default);
    assert!(nested.loop_state().is_none());
    assert!(!nested.function_state().unwrap().is_return());
}

#[test]
fn loop_frames_own_their_flags() {
    let (_, global) = chain();
    let function = global.fork(ContextKind::Function, ContextState::Default);
    let (loop_ctx, flags) = function.fork_loop();

    assert_eq!(loop_ctx.kind(), ContextKind::Loop);
    flags.set_break(true);
    assert!(loop_ctx.loop_state().unwrap().is_break());

    set(&loop_ctx, "i", 1);
    assert_eq!(get(&function, "i"), Value::from(1));

    loop_ctx.function_state().unwrap().finish(Value::from(2));
    assert!(function.function_state().unwrap().is_return());

    let (inner, inner_flags) = loop_ctx.fork_loop();
    assert!(!inner_flags.is_break());
    assert!(!inner.loop_state().unwrap().is_break());
}

#[test]
fn step_records_last_active() {
    let (api, global) = chain();
    assert!(api.last_active().is_none());

    let position = Position { line: 4, character: 2 };
    global.step(position);
    assert_eq!(global.position(), position);
    assert!(Rc::ptr_eq(&api.last_active().unwrap(), &global));

    let injected = global.fork_with(ContextKind::Call, ContextState::Temporary, None, Some(true));
    injected.step(Position { line: 9, character: 1 });
    assert!(Rc::ptr_eq(&api.last_active().unwrap(), &global));

    global.clear_last_active();
    assert!(api.last_active().is_none());
}

#[test]
fn exit_requires_a_pending_run() {
    let (api, global) = chain();
    assert_eq!(global.exit().unwrap_err().message(), "No running process was found.");

    api.runtime().process.signals().set_pending(true);
    global.exit().unwrap();
    assert!(api.is_exit());
}
