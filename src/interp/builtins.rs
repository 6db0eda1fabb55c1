//! Built-in operations
//!
//! The catalogue installed into the outermost frame of every interpreter.
//! Control-transferring natives (`!`, `!?`) return their target list as a
//! continuation instead of executing it themselves, which keeps them
//! tail-call transparent: the evaluator splices the continuation into its
//! trampoline when the native sits in tail position.

use super::error::{InterpResult, RuntimeError};
use super::eval::Interpreter;
use super::scope::UndeclareFailure;
use super::value::{Tag, Value};
use std::io::{Read, Write};

/// Install the whole catalogue into the current (outermost) frame
pub fn install(interp: &mut Interpreter) {
    // Meta
    interp.declare_native("!", exec);
    interp.declare_native("!?", exec_if);
    interp.declare_native("=", eql);
    interp.declare_native("$parse", parse);
    interp.declare_native("with", with);
    interp.declare_native("type?", type_of);
    interp.declare_native("try", try_run);
    // Symbol operations
    interp.declare_native("quote", quote);
    interp.declare_native("unquote", unquote);
    // List operations
    interp.declare_native("length", length);
    interp.declare_native("cons", cons);
    interp.declare_native("uncons", uncons);
    // Reserving operations
    interp.declare_native("$=>", def_operation);
    interp.declare_native("$->", def_value);
    interp.declare_native("$<-", undef_value);
    // Boolean data
    interp.declare_native("TRUE", push_true);
    interp.declare_native("FALSE", push_false);
    // Boolean operations
    interp.declare_native("and", and);
    interp.declare_native("or", or);
    interp.declare_native("not", not);
    // Math operations
    interp.declare_native("+", add);
    interp.declare_native("-", sub);
    interp.declare_native("*", mul);
    interp.declare_native("/", div);
    interp.declare_native("^", pow);
    interp.declare_native("%", rem);
    interp.declare_native("abs", abs);
    interp.declare_native(">", gt);
    interp.declare_native("<", lt);
    // IO operations
    interp.declare_native("print", print);
    interp.declare_native("getc", getc);
}

/// Collect a character list into raw bytes
fn list_to_bytes(list: Vec<Value>) -> InterpResult<Vec<u8>> {
    list.into_iter()
        .map(|v| match v {
            Value::Character(c) => Ok(c),
            other => Err(RuntimeError::type_mismatch(Tag::Character, other.tag())),
        })
        .collect()
}

fn exec(interp: &mut Interpreter) -> InterpResult<Option<Vec<Value>>> {
    let list = interp.pop_list()?;
    Ok(Some(list))
}

fn exec_if(interp: &mut Interpreter) -> InterpResult<Option<Vec<Value>>> {
    let list = interp.pop_list()?;
    let condition = interp.pop_boolean()?;
    Ok(if condition { Some(list) } else { None })
}

fn eql(interp: &mut Interpreter) -> InterpResult<Option<Vec<Value>>> {
    let r = interp.pop()?;
    let l = interp.pop()?;
    interp.push(Value::Boolean(l == r));
    Ok(None)
}

/// Parse a character list at runtime
///
/// Success pushes the parsed program list then `:success`; a malformed source
/// is not fatal and pushes only `:failure`, making this the one parser-level
/// recovery point.
fn parse(interp: &mut Interpreter) -> InterpResult<Option<Vec<Value>>> {
    let bytes = list_to_bytes(interp.pop_list()?)?;
    let source = String::from_utf8_lossy(&bytes).into_owned();
    match interp.parse_source(&source) {
        Ok(program) => {
            let sentinel = interp.intern("success");
            interp.push(Value::List(program));
            interp.push(Value::QuotedSymbol(sentinel));
        }
        Err(_) => {
            let sentinel = interp.intern("failure");
            interp.push(Value::QuotedSymbol(sentinel));
        }
    }
    Ok(None)
}

/// Load, parse and execute another file
///
/// The imported program runs unscoped, so its declarations land in the
/// caller's frame.
fn with(interp: &mut Interpreter) -> InterpResult<Option<Vec<Value>>> {
    let bytes = list_to_bytes(interp.pop_list()?)?;
    let path = String::from_utf8_lossy(&bytes).into_owned();
    let source = std::fs::read_to_string(&path).map_err(|e| RuntimeError::Io {
        path: path.clone(),
        message: e.to_string(),
    })?;
    let program = interp
        .parse_source(&source)
        .map_err(|e| RuntimeError::Syntax(format!("{path}: {}", e.message())))?;
    interp.exec_list(program, false)?;
    Ok(None)
}

fn type_of(interp: &mut Interpreter) -> InterpResult<Option<Vec<Value>>> {
    let value = interp.pop()?;
    let name = interp.intern(&value.tag().to_string());
    interp.push(value);
    interp.push(Value::QuotedSymbol(name));
    Ok(None)
}

/// The one recovery boundary
///
/// Runs the popped action against an empty operand stack. Completion wraps
/// the sub-stack into a list (push order preserved) followed by `:success`;
/// a fatal condition discards the sub-stack, rolls the scope chain back to
/// its depth at entry, and pushes only `:failure`. Either way nothing
/// declared inside the action survives.
fn try_run(interp: &mut Interpreter) -> InterpResult<Option<Vec<Value>>> {
    let action = interp.pop_list()?;
    let saved_stack = std::mem::take(&mut interp.stack);
    let saved_depth = interp.scopes.depth();
    match interp.exec_list(action, true) {
        Ok(()) => {
            let sub_stack = std::mem::replace(&mut interp.stack, saved_stack);
            let sentinel = interp.intern("success");
            interp.push(Value::List(sub_stack));
            interp.push(Value::QuotedSymbol(sentinel));
        }
        Err(_) => {
            interp.stack = saved_stack;
            interp.scopes.truncate(saved_depth);
            let sentinel = interp.intern("failure");
            interp.push(Value::QuotedSymbol(sentinel));
        }
    }
    Ok(None)
}

fn quote(interp: &mut Interpreter) -> InterpResult<Option<Vec<Value>>> {
    match interp.pop()? {
        Value::Symbol(sym) => {
            interp.push(Value::QuotedSymbol(sym));
            Ok(None)
        }
        other => Err(RuntimeError::type_mismatch(Tag::Symbol, other.tag())),
    }
}

fn unquote(interp: &mut Interpreter) -> InterpResult<Option<Vec<Value>>> {
    let sym = interp.pop_quoted_symbol()?;
    interp.push(Value::Symbol(sym));
    Ok(None)
}

fn length(interp: &mut Interpreter) -> InterpResult<Option<Vec<Value>>> {
    let list = interp.pop_list()?;
    let len = list.len();
    interp.push(Value::List(list));
    interp.push(Value::Number(len as f64));
    Ok(None)
}

fn cons(interp: &mut Interpreter) -> InterpResult<Option<Vec<Value>>> {
    let head = interp.pop()?;
    let mut list = interp.pop_list()?;
    list.insert(0, head);
    interp.push(Value::List(list));
    Ok(None)
}

fn uncons(interp: &mut Interpreter) -> InterpResult<Option<Vec<Value>>> {
    let mut list = interp.pop_list()?;
    if list.is_empty() {
        return Err(RuntimeError::EmptyList);
    }
    let head = list.remove(0);
    interp.push(Value::List(list));
    interp.push(head);
    Ok(None)
}

fn def_operation(interp: &mut Interpreter) -> InterpResult<Option<Vec<Value>>> {
    let sym = interp.pop_quoted_symbol()?;
    let body = interp.pop_list()?;
    if !interp.scopes.declare_operation(sym, body) {
        let name = interp.symbol_name(sym).to_string();
        return Err(RuntimeError::RedeclaredOperation(name));
    }
    Ok(None)
}

fn def_value(interp: &mut Interpreter) -> InterpResult<Option<Vec<Value>>> {
    let sym = interp.pop_quoted_symbol()?;
    let value = interp.pop()?;
    interp.scopes.declare_value(sym, value);
    Ok(None)
}

fn undef_value(interp: &mut Interpreter) -> InterpResult<Option<Vec<Value>>> {
    let sym = interp.pop_quoted_symbol()?;
    match interp.scopes.undeclare_value(sym) {
        Ok(value) => {
            interp.push(value);
            Ok(None)
        }
        Err(UndeclareFailure::NotDeclared) => {
            let name = interp.symbol_name(sym).to_string();
            Err(RuntimeError::UndeclaredValue(name))
        }
        Err(UndeclareFailure::WrongKind) => {
            let name = interp.symbol_name(sym).to_string();
            Err(RuntimeError::NotAStoredValue(name))
        }
    }
}

fn push_true(interp: &mut Interpreter) -> InterpResult<Option<Vec<Value>>> {
    interp.push(Value::Boolean(true));
    Ok(None)
}

fn push_false(interp: &mut Interpreter) -> InterpResult<Option<Vec<Value>>> {
    interp.push(Value::Boolean(false));
    Ok(None)
}

fn and(interp: &mut Interpreter) -> InterpResult<Option<Vec<Value>>> {
    let r = interp.pop_boolean()?;
    let l = interp.pop_boolean()?;
    interp.push(Value::Boolean(l && r));
    Ok(None)
}

fn or(interp: &mut Interpreter) -> InterpResult<Option<Vec<Value>>> {
    let r = interp.pop_boolean()?;
    let l = interp.pop_boolean()?;
    interp.push(Value::Boolean(l || r));
    Ok(None)
}

fn not(interp: &mut Interpreter) -> InterpResult<Option<Vec<Value>>> {
    let b = interp.pop_boolean()?;
    interp.push(Value::Boolean(!b));
    Ok(None)
}

fn add(interp: &mut Interpreter) -> InterpResult<Option<Vec<Value>>> {
    let r = interp.pop_number()?;
    let l = interp.pop_number()?;
    interp.push(Value::Number(l + r));
    Ok(None)
}

fn sub(interp: &mut Interpreter) -> InterpResult<Option<Vec<Value>>> {
    let r = interp.pop_number()?;
    let l = interp.pop_number()?;
    interp.push(Value::Number(l - r));
    Ok(None)
}

fn mul(interp: &mut Interpreter) -> InterpResult<Option<Vec<Value>>> {
    let r = interp.pop_number()?;
    let l = interp.pop_number()?;
    interp.push(Value::Number(l * r));
    Ok(None)
}

// Division by zero follows IEEE 754: infinities and NaN, never a fatal
// condition
fn div(interp: &mut Interpreter) -> InterpResult<Option<Vec<Value>>> {
    let r = interp.pop_number()?;
    let l = interp.pop_number()?;
    interp.push(Value::Number(l / r));
    Ok(None)
}

fn pow(interp: &mut Interpreter) -> InterpResult<Option<Vec<Value>>> {
    let r = interp.pop_number()?;
    let l = interp.pop_number()?;
    interp.push(Value::Number(l.powf(r)));
    Ok(None)
}

fn rem(interp: &mut Interpreter) -> InterpResult<Option<Vec<Value>>> {
    let r = interp.pop_number()?;
    let l = interp.pop_number()?;
    interp.push(Value::Number(l % r));
    Ok(None)
}

fn abs(interp: &mut Interpreter) -> InterpResult<Option<Vec<Value>>> {
    let n = interp.pop_number()?;
    interp.push(Value::Number(n.abs()));
    Ok(None)
}

fn gt(interp: &mut Interpreter) -> InterpResult<Option<Vec<Value>>> {
    let r = interp.pop_number()?;
    let l = interp.pop_number()?;
    interp.push(Value::Boolean(l > r));
    Ok(None)
}

fn lt(interp: &mut Interpreter) -> InterpResult<Option<Vec<Value>>> {
    let r = interp.pop_number()?;
    let l = interp.pop_number()?;
    interp.push(Value::Boolean(l < r));
    Ok(None)
}

fn print(interp: &mut Interpreter) -> InterpResult<Option<Vec<Value>>> {
    let value = interp.pop()?;
    let mut out = std::io::stdout();
    let _ = out.write_all(value.display_string(interp.interner()).as_bytes());
    let _ = out.flush();
    Ok(None)
}

fn getc(interp: &mut Interpreter) -> InterpResult<Option<Vec<Value>>> {
    let mut buf = [0u8; 1];
    let byte = match std::io::stdin().read(&mut buf) {
        Ok(1) => buf[0],
        // EOF and read failures both yield the sentinel byte
        _ => 0xFF,
    };
    interp.push(Value::Character(byte));
    Ok(None)
}
