#![allow(clippy::unwrap_used)]

use super::*;
use std::cell::Cell;
use std::thread;
use std::time::Duration;

use crate::context::Runtime;
use crate::handler::HandlerContainer;

fn root(debugger: &Debugger) -> Rc<Context> {
    let runtime = Rc::new(Runtime::new(HandlerContainer::default(), debugger.clone()));
    Context::root("test", runtime)
}

struct Count(Cell<u32>);

impl Interact for Count {
    fn interact(&self, debugger: &Debugger, _ctx: &Rc<Context>, _position: Position) {
        self.0.set(self.0.get() + 1);
        // Let the pause fall through without another thread.
        debugger.next_step();
    }
}

#[test]
fn breakpoint_toggles() {
    let debugger = Debugger::new();
    assert!(!debugger.is_armed());
    debugger.set_breakpoint(true);
    assert!(debugger.is_armed());
    debugger.set_breakpoint(false);
    assert!(!debugger.is_armed());
}

#[test]
fn wait_returns_when_disarmed_or_exiting() {
    let signals = StepSignals::default();
    let exit = AtomicBool::new(false);
    signals.wait(&exit);

    signals.set_breakpoint(true);
    exit.store(true, Ordering::Release);
    signals.wait(&exit);
    assert!(signals.is_armed());
}

#[test]
fn next_step_releases_one_wait() {
    let signals = Arc::new(StepSignals::default());
    signals.set_breakpoint(true);

    let stepper = {
        let signals = Arc::clone(&signals);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            signals.next_step();
        })
    };
    signals.wait(&AtomicBool::new(false));
    stepper.join().unwrap();

    assert!(signals.is_armed());
    assert!(!signals.state.lock().next_step);
}

#[test]
fn resume_from_another_thread() {
    let signals = Arc::new(StepSignals::default());
    signals.set_breakpoint(true);

    let resumer = {
        let signals = Arc::clone(&signals);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            signals.set_breakpoint(false);
        })
    };
    signals.wait(&AtomicBool::new(false));
    resumer.join().unwrap();
    assert!(!signals.is_armed());
}

#[test]
fn default_hook_disarms() {
    let debugger = Debugger::new();
    let ctx = root(&debugger);
    debugger.set_breakpoint(true);
    debugger.pause(&ctx, Position::default(), &AtomicBool::new(false));
    assert!(!debugger.is_armed());
}

#[test]
fn custom_hook_sees_every_pause() {
    let count = Rc::new(Count(Cell::new(0)));
    let debugger = Debugger::with_interact(count.clone());
    let ctx = root(&debugger);
    debugger.set_breakpoint(true);

    debugger.pause(&ctx, Position::default(), &AtomicBool::new(false));
    debugger.pause(&ctx, Position::default(), &AtomicBool::new(false));

    assert_eq!(count.0.get(), 2);
    assert!(debugger.is_armed());
}

#[test]
fn set_interact_is_shared_by_clones() {
    let debugger = Debugger::new();
    let clone = debugger.clone();
    let count = Rc::new(Count(Cell::new(0)));
    clone.set_interact(count.clone());

    let ctx = root(&debugger);
    debugger.set_breakpoint(true);
    debugger.pause(&ctx, Position::default(), &AtomicBool::new(false));
    assert_eq!(count.0.get(), 1);
}
