use std::cell::RefCell;
use std::rc::{Rc, Weak};

use pretty_assertions::assert_eq;

use super::{builder, run};
use crate::{
    Collect, ErrorHandler, Function, HandlerContainer, Interface, Interpreter, ScriptMap, Value,
};

#[test]
fn host_api_is_callable() {
    let (builder, output) = builder();
    let interpreter = builder
        .define(
            "greet",
            Function::native("greet", |call| {
                Ok(Value::from(format!("hi {}", call.arg("name"))))
            })
            .param_with_default("name", Value::from("there")),
        )
        .define("version", 3)
        .build();
    interpreter
        .run("print(greet(\"bob\"))\nprint(greet())\nprint(version)")
        .unwrap();
    assert_eq!(output.take(), vec!["hi bob", "hi there", "3"]);
}

#[test]
fn host_api_is_merged_over_builtins() {
    let (builder, output) = builder();
    let interpreter = builder
        .define("print", Function::native("print", |_| Ok(Value::Nil)).param("message"))
        .build();
    interpreter.run("print(str(1))").unwrap();
    assert!(output.take().is_empty());
}

#[test]
fn host_interfaces_receive_self() {
    let counter = Interface::new("Counter").with(
        "describe",
        Function::native("describe", |call| Ok(Value::from(call.this.type_name()))),
    );
    let (builder, output) = builder();
    let interpreter = builder.define("counter", counter).build();
    interpreter.run("print(counter.describe())").unwrap();
    assert_eq!(output.take(), vec!["Counter"]);
}

#[test]
fn params_hold_argv() {
    let (builder, output) = builder();
    let interpreter = builder.argv(["first", "second"]).build();
    interpreter
        .run("print(params.length())\nprint(params[0])\nprint(params[-1])")
        .unwrap();
    assert_eq!(output.take(), vec!["2", "first", "second"]);

    interpreter.set_argv(Vec::new());
    interpreter.run("print(params)").unwrap();
    assert_eq!(output.take(), vec!["[  ]"]);
}

#[test]
fn globals_survive_between_runs() {
    let (builder, output) = builder();
    let interpreter = builder.build();
    interpreter.run("count = 1").unwrap();
    interpreter.run("count = count + 1\nprint(count)").unwrap();
    assert_eq!(output.take(), vec!["2"]);
}

#[test]
fn global_variables_from_the_host() {
    let (builder, output) = builder();
    let interpreter = builder.build();
    interpreter.run("config = {\"depth\": 1}").unwrap();

    assert_eq!(interpreter.get_global_variable("config.depth").unwrap(), Value::from(1));
    interpreter
        .set_global_variable("config.depth", Value::from(4))
        .unwrap();
    interpreter.set_global_variable("name", Value::from("host")).unwrap();
    interpreter.run("print(config.depth)\nprint(name)").unwrap();
    assert_eq!(output.take(), vec!["4", "host"]);

    assert_eq!(
        interpreter.get_global_variable("missing").unwrap_err().message(),
        "Cannot get path missing."
    );
}

#[test]
fn set_target_drops_globals() {
    let (builder, _) = builder();
    let interpreter = builder.build();
    interpreter.run("kept = 1").unwrap();
    interpreter.set_target("other.src").unwrap();
    assert_eq!(interpreter.target(), "other.src");
    assert!(interpreter.get_global_variable("kept").is_err());
}

#[test]
fn run_target_reads_through_the_resource_handler() {
    let (builder, output) = builder();
    let interpreter = builder.target("lib/util.src").build();
    interpreter.run_target().unwrap();
    assert_eq!(interpreter.get_global_variable("y").unwrap(), Value::from(10));
    assert!(output.take().is_empty());

    interpreter.set_target("nowhere.src").unwrap();
    assert_eq!(
        interpreter.run_target().unwrap_err().to_string(),
        "InterpreterException: Cannot find target nowhere.src."
    );
}

#[test]
fn collect_handler_swallows_errors() {
    let collect = Rc::new(Collect::new());
    let (builder, output) = builder();
    let interpreter = builder
        .error(Rc::clone(&collect) as Rc<dyn ErrorHandler>)
        .build();

    interpreter.run("print(1)\nbreak\nprint(2)").unwrap();
    interpreter.run("x = ").unwrap();

    assert_eq!(output.take(), vec!["1"]);
    let messages: Vec<String> = collect.take().iter().map(ToString::to_string).collect();
    assert_eq!(
        messages,
        vec![
            "InterpreterException: Unexpected break statement.",
            "ParserException: Unexpected expression at line 1.",
        ]
    );
}

#[test]
fn force_mode_keeps_running() {
    let (builder, output) = builder();
    let interpreter = builder.force(true).build();
    interpreter
        .run("a = \nprint(2)\nimport \"lib/broken.src\"\nprint(w)")
        .unwrap();
    assert_eq!(output.take(), vec!["2", "4"]);

    let recovered: Vec<String> = interpreter
        .take_recovered_errors()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        recovered,
        vec![
            "ParserException: Unexpected expression at line 1.",
            "ParserException: Unexpected expression at line 1.",
        ]
    );
    assert!(interpreter.take_recovered_errors().is_empty());
}

#[test]
fn inject_runs_against_globals() {
    let (builder, output) = builder();
    let interpreter = builder.build();
    interpreter.run("x = 5").unwrap();
    interpreter.inject("print(x * 2)\ny = x + 1").unwrap();
    assert_eq!(output.take(), vec!["10"]);
    assert_eq!(interpreter.get_global_variable("y").unwrap(), Value::from(6));
}

#[test]
fn inject_in_last_context_needs_a_run() {
    let interpreter = Interpreter::new();
    assert_eq!(
        interpreter.inject_in_last_context("x = 1").unwrap_err().to_string(),
        "InterpreterException: Unable to inject into last context."
    );
}

/// Native function that calls back into its own interpreter mid-run.
fn reentrant(
    name: &str,
    interpreter: &Rc<Interpreter>,
    seen: &Rc<RefCell<Vec<String>>>,
    body: fn(&Interpreter) -> String,
) -> Function {
    let interpreter: Weak<Interpreter> = Rc::downgrade(interpreter);
    let seen = Rc::clone(seen);
    Function::native(name, move |_| {
        if let Some(interpreter) = interpreter.upgrade() {
            seen.borrow_mut().push(body(&interpreter));
        }
        Ok(Value::Nil)
    })
}

#[test]
fn configuration_is_locked_while_running() {
    let (builder, _) = builder();
    let interpreter = Rc::new(builder.build());
    let seen = Rc::new(RefCell::new(Vec::new()));

    let mut api = ScriptMap::new();
    api.insert(
        "probe",
        Value::from(reentrant("probe", &interpreter, &seen, |interpreter| {
            let results = [
                interpreter.set_target("x.src").map_err(|err| err.message()),
                interpreter.set_api(ScriptMap::new()).map_err(|err| err.message()),
                interpreter
                    .set_handlers(HandlerContainer::default())
                    .map_err(|err| err.message()),
                interpreter
                    .set_debugger(Rc::new(crate::NoInteract))
                    .map_err(|err| err.message()),
                interpreter.run("z = 1").map_err(|err| err.message()),
            ];
            results
                .into_iter()
                .map(|result| result.err().unwrap_or_default())
                .collect::<Vec<_>>()
                .join("|")
        })),
    );
    interpreter.set_api(api).unwrap();
    interpreter.run("probe()").unwrap();

    assert_eq!(
        *seen.borrow(),
        vec![[
            "You cannot set a target while a process is running.",
            "You cannot set an api while a process is running.",
            "You cannot set a handler while a process is running.",
            "You cannot set a output handler while a process is running.",
            "Process already running.",
        ]
        .join("|")]
    );
    assert!(!interpreter.is_pending());
    assert_eq!(interpreter.target(), "main.src");
}

#[test]
fn inject_in_last_context_reaches_the_running_frame() {
    let (builder, output) = builder();
    let interpreter = Rc::new(builder.build());
    let seen = Rc::new(RefCell::new(Vec::new()));

    let mut api = ScriptMap::new();
    api.insert(
        "probe",
        Value::from(reentrant("probe", &interpreter, &seen, |interpreter| {
            match interpreter.inject_in_last_context("print(n)\nn = n + 100") {
                Ok(()) => "ok".to_string(),
                Err(err) => err.to_string(),
            }
        })),
    );
    interpreter.set_api(api).unwrap();
    let source = "\
function inner(n)
  probe()
  return n
end function
print(inner(1))";
    interpreter.run(source).unwrap();

    assert_eq!(*seen.borrow(), vec!["ok"]);
    assert_eq!(output.take(), vec!["1", "101"]);
}

#[test]
fn output_handler_is_shared() {
    let printed = run("print(\"a\")\nprint([1, \"b\"])");
    assert_eq!(printed, vec!["a", "[ 1, b ]"]);
}
