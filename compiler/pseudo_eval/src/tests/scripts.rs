use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::{builder, run, run_err};

#[test]
fn prints_once_per_call() {
    assert_eq!(run("print(1 + 2)\nprint(\"done\")"), vec!["3", "done"]);
}

#[test]
fn closures_see_later_assignments() {
    let source = "\
x = 1
function show()
  print(x)
end function
x = 2
show()";
    assert_eq!(run(source), vec!["2"]);
}

#[test]
fn while_loop_with_break() {
    let source = "\
i = 0
while true
  if i == 3 then break
  print(i)
  i = i + 1
end while";
    assert_eq!(run(source), vec!["0", "1", "2"]);
}

#[test]
fn continue_skips_rest_of_iteration() {
    let source = "\
for n in range(0, 6)
  if n % 2 == 1 then continue
  print(n)
end for";
    assert_eq!(run(source), vec!["0", "2", "4"]);
}

#[test]
fn for_over_list_map_and_string() {
    let source = "\
for x in [10, 20, 30]
  print(x)
end for
for entry in {\"a\": 1}
  print(entry.key + \"=\" + entry.value)
end for
for c in \"hi\"
  print(c)
end for";
    assert_eq!(run(source), vec!["10", "20", "30", "a=1", "h", "i"]);
}

#[test]
fn appending_during_a_for_loop_does_not_extend_it() {
    let source = "\
items = [1, 2]
n = 0
for x in items
  n = n + 1
  items.push(x)
end for
print(n)
print(items.length())";
    assert_eq!(run(source), vec!["2", "4"]);
}

#[test]
fn deleting_during_a_map_loop_visits_every_entry() {
    let source = "\
table = {\"a\": 1, \"b\": 2, \"c\": 3}
for entry in table
  table.delete(entry.key)
  print(entry.key)
end for
print(table.length())";
    assert_eq!(run(source), vec!["a", "b", "c", "0"]);
}

#[test]
fn nested_loops_break_independently() {
    let source = "\
for a in [1, 2]
  for b in [1, 2, 3]
    if b == 2 then break
    print(str(a) + \":\" + b)
  end for
end for";
    assert_eq!(run(source), vec!["1:1", "2:1"]);
}

#[test]
fn return_leaves_the_loop_and_function() {
    let source = "\
function first(list)
  for x in list
    if x > 1 then return x
  end for
  return -1
end function
print(first([1, 5, 9]))
print(first([]))";
    assert_eq!(run(source), vec!["5", "-1"]);
}

#[test]
fn top_level_break_is_an_error() {
    let (builder, _) = builder();
    let err = builder.build().run("x = 1\nbreak").unwrap_err();
    assert_eq!(err.to_string(), "InterpreterException: Unexpected break statement.");
    assert_eq!(err.line(), Some(2));
}

#[test]
fn top_level_return_is_an_error() {
    assert_eq!(run_err("return 1"), "InterpreterException: Unexpected return statement.");
}

#[test]
fn default_parameters() {
    let source = "\
function add(a, b = 1)
  return a + b
end function
print(add(2, 4))
print(add(2))";
    assert_eq!(run(source), vec!["6", "3"]);
}

#[test]
fn anonymous_functions_are_values() {
    let source = "\
twice = function(f, x)
  return f(f(x))
end function
inc = function(n) return n + 1 end function
print(twice(inc, 3))";
    assert_eq!(run(source), vec!["5"]);
}

#[test]
fn recursion() {
    let source = "\
function fib(n)
  if n < 2 then return n
  return fib(n - 1) + fib(n - 2)
end function
print(fib(15))";
    assert_eq!(run(source), vec!["610"]);
}

#[test]
fn import_runs_under_the_importing_scope() {
    let source = "\
import \"lib/util.src\"
print(y)
print(double(4))";
    assert_eq!(run(source), vec!["10", "8"]);
}

#[test]
fn missing_import_is_reported() {
    assert_eq!(
        run_err("import \"lib/missing.src\""),
        "InterpreterException: Cannot find import lib/missing.src."
    );
}

#[test]
fn list_and_map_addition_copy() {
    let source = "\
a = [1]
b = a + [2]
print(a)
print(b)
m = {\"x\": 1}
n = m + {\"y\": 2}
print(m)
print(n)";
    assert_eq!(
        run(source),
        vec!["[ 1 ]", "[ 1, 2 ]", "{ x: 1 }", "{ x: 1, y: 2 }"]
    );
}

#[test]
fn lists_are_shared_by_reference() {
    let source = "\
a = [1, 2]
b = a
b.push(3)
print(a.length())
b[0] = 9
print(a[0])";
    assert_eq!(run(source), vec!["3", "9"]);
}

#[test]
fn intrinsics_from_script() {
    let source = "\
greeting = \"Hello\"
print(greeting.toUpperCase())
padded = \" pad \"
print(padded.trim().length())
csv = \"a,b,c\"
print(csv.split(\",\").join(\"-\"))
nums = [3, 1, 2]
print(nums.indexOf(1))
table = {\"k\": 1}
print(table.keys())
print(abs(-4) + floor(2.7))
print(str(12) + val(\"3\"))
print(char(65) + code(\"B\"))";
    assert_eq!(
        run(source),
        vec!["HELLO", "3", "a-b-c", "1", "[ k ]", "6", "123", "A66"]
    );
}

#[test]
fn higher_order_list_intrinsics() {
    let source = "\
function double(n) return n * 2 end function
function add(acc, n) return acc + n end function
list = [1, 2, 3]
print(list.map(double))
print(list.reduce(add, 10))";
    assert_eq!(run(source), vec!["[ 2, 4, 6 ]", "16"]);
}

#[test]
fn strings_cannot_be_assigned_into() {
    assert_eq!(
        run_err("s = \"abc\"\ns[0] = \"x\""),
        "InterpreterException: Mutable operations are not allowed on string."
    );
}

#[test]
fn calling_a_number_fails() {
    assert_eq!(run_err("x = 1\nx()"), "InterpreterException: Unexpected handle for function call.");
}

#[test]
fn globals_and_locals_prefixes() {
    let source = "\
x = 1
function f()
  x = 2
  globals.y = x
  print(locals.x)
end function
f()
print(x)
print(y)";
    assert_eq!(run(source), vec!["2", "1", "2"]);
}

proptest! {
    #[test]
    fn integer_arithmetic_matches(a in -10_000i32..10_000, b in 1i32..10_000) {
        let printed = run(&format!("print({a} + {b})\nprint({a} * {b})"));
        prop_assert_eq!(printed, vec![(a + b).to_string(), (a * b).to_string()]);
    }
}
