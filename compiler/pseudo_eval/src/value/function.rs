//! Callable values and host interfaces.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::context::Context;
use crate::operation::FunctionDef;
use crate::{EvalResult, Value};

/// Host callback behind a native function.
pub type NativeFn = Rc<dyn Fn(&NativeCall<'_>) -> EvalResult>;

/// A script closure or a host function.
pub struct Function {
    name: Rc<str>,
    kind: FunctionKind,
}

enum FunctionKind {
    /// Closure over the context it was declared in.
    Script {
        def: Rc<FunctionDef>,
        scope: Rc<Context>,
    },
    Native {
        params: Vec<NativeParam>,
        callback: NativeFn,
    },
}

struct NativeParam {
    name: Rc<str>,
    default: Value,
}

impl Function {
    pub(crate) fn script(def: Rc<FunctionDef>, scope: Rc<Context>) -> Self {
        Function {
            name: Rc::clone(def.name()),
            kind: FunctionKind::Script { def, scope },
        }
    }

    /// A host function. Declare its parameters with [`Function::param`]
    /// and [`Function::param_with_default`].
    pub fn native(
        name: &str,
        callback: impl Fn(&NativeCall<'_>) -> EvalResult + 'static,
    ) -> Self {
        Function {
            name: Rc::from(name),
            kind: FunctionKind::Native {
                params: Vec::new(),
                callback: Rc::new(callback),
            },
        }
    }

    /// Add a parameter that defaults to nil.
    #[must_use]
    pub fn param(self, name: &str) -> Self {
        self.param_with_default(name, Value::Nil)
    }

    #[must_use]
    pub fn param_with_default(mut self, name: &str, default: Value) -> Self {
        if let FunctionKind::Native { params, .. } = &mut self.kind {
            params.push(NativeParam {
                name: Rc::from(name),
                default,
            });
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn param_names(&self) -> Vec<Rc<str>> {
        match &self.kind {
            FunctionKind::Script { def, .. } => def.param_names().cloned().collect(),
            FunctionKind::Native { params, .. } => {
                params.iter().map(|param| Rc::clone(&param.name)).collect()
            }
        }
    }

    /// Invoke with `this` as the receiver.
    ///
    /// Missing arguments take their parameter's default. `ctx` is the
    /// calling context; script closures ignore it and run in a fork of the
    /// context they captured.
    pub fn run(&self, ctx: &Rc<Context>, this: Value, args: Vec<Value>) -> EvalResult {
        match &self.kind {
            FunctionKind::Script { def, scope } => def.invoke(scope, this, args),
            FunctionKind::Native { params, callback } => {
                let count = params.len().max(args.len());
                let mut args = args.into_iter();
                let values = (0..count)
                    .map(|index| {
                        args.next().unwrap_or_else(|| {
                            params
                                .get(index)
                                .map(|param| param.default.clone())
                                .unwrap_or_default()
                        })
                    })
                    .collect();
                callback(&NativeCall {
                    ctx,
                    this: &this,
                    params,
                    args: values,
                })
            }
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = self
            .param_names()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        write!(f, "function {}({})", self.name, params.join(", "))
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Arguments of one native call.
pub struct NativeCall<'a> {
    pub ctx: &'a Rc<Context>,
    /// Receiver; nil for plain calls.
    pub this: &'a Value,
    params: &'a [NativeParam],
    args: Vec<Value>,
}

impl NativeCall<'_> {
    /// Argument bound to the parameter `name`, or nil.
    pub fn arg(&self, name: &str) -> Value {
        self.params
            .iter()
            .position(|param| &*param.name == name)
            .and_then(|index| self.args.get(index).cloned())
            .unwrap_or_default()
    }

    /// Every argument, declared parameters first.
    pub fn args(&self) -> &[Value] {
        &self.args
    }
}

/// A named, read-only bag of functions exposed by the host.
pub struct Interface {
    name: Rc<str>,
    functions: IndexMap<String, Value>,
}

impl Interface {
    pub fn new(name: &str) -> Self {
        Interface {
            name: Rc::from(name),
            functions: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, name: &str, function: Function) -> Self {
        self.functions.insert(name.to_string(), Value::from(function));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.functions.get(name).cloned()
    }
}
