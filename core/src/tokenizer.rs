//! The byte-at-a-time state machine at the heart of the parser.
//!
//! [`step`] reads the top frame of a [`FrameStack`], dispatches on its
//! [`TokenKind`], and either mutates that frame in place, pushes/pops a
//! child frame, or raises an observer event — consuming exactly one input
//! byte per call.

use crate::error::Error;
use crate::frame::TokenKind;
use crate::frame_stack::FrameStack;
use crate::observer::Observer;

#[cfg(feature = "tracing")]
use tracing::trace;

#[inline]
fn is_digit(byte: u8) -> bool {
    byte.is_ascii_digit()
}

#[inline]
fn digit_value(byte: u8) -> i64 {
    (byte - b'0') as i64
}

fn unexpected(byte: u8, state: &'static str, offset: usize) -> Error {
    Error::UnexpectedByte {
        byte,
        state,
        offset,
    }
}

/// Consumes one byte, advancing `stack`'s top frame and raising whatever
/// observer events that byte completes.
///
/// `offset` is the absolute position of `byte` in the logical input stream,
/// used only to annotate [`Error::UnexpectedByte`].
pub(crate) fn step<O: Observer>(
    stack: &mut FrameStack,
    observer: &mut O,
    byte: u8,
    offset: usize,
) -> Result<(), Error> {
    match stack.top().token_kind {
        TokenKind::None | TokenKind::DictVal => start_value(stack, observer, byte, offset),
        TokenKind::Int => step_int(stack, observer, byte, offset),
        TokenKind::StrLen => step_str_len(stack, observer, byte, offset),
        TokenKind::Str => step_str(stack, observer, byte),
        TokenKind::List => step_list(stack, observer, byte, offset),
        TokenKind::Dict => step_dict(stack, observer, byte, offset),
        TokenKind::DictKeyLen => step_dict_keylen(stack, observer, byte, offset),
        TokenKind::DictKey => step_dict_key(stack, observer, byte),
    }
}

/// Shared by `NONE` and `DICT_VAL`: decide what kind of value starts here,
/// transitioning the *current* frame in place.
fn start_value<O: Observer>(
    stack: &mut FrameStack,
    observer: &mut O,
    byte: u8,
    offset: usize,
) -> Result<(), Error> {
    match byte {
        b'i' => {
            let f = stack.top_mut();
            f.token_kind = TokenKind::Int;
            f.pending_int = 0;
            f.pos = 0;
            Ok(())
        }
        b'd' => {
            let key = stack.top().current_key().map(<[u8]>::to_vec);
            stack.top_mut().token_kind = TokenKind::Dict;
            #[cfg(feature = "tracing")]
            trace!(depth = stack.depth(), key = ?key, "dict_enter");
            if !observer.dict_enter(key.as_deref()) {
                return Err(Error::ObserverAbort);
            }
            Ok(())
        }
        b'l' => {
            let key = stack.top().current_key().map(<[u8]>::to_vec);
            stack.top_mut().token_kind = TokenKind::List;
            #[cfg(feature = "tracing")]
            trace!(depth = stack.depth(), key = ?key, "list_enter");
            if !observer.list_enter(key.as_deref()) {
                return Err(Error::ObserverAbort);
            }
            Ok(())
        }
        b if is_digit(b) => {
            let f = stack.top_mut();
            f.token_kind = TokenKind::StrLen;
            f.pending_len = digit_value(b) as usize;
            f.pos = 0;
            Ok(())
        }
        other => Err(unexpected(other, "NONE", offset)),
    }
}

fn step_int<O: Observer>(
    stack: &mut FrameStack,
    observer: &mut O,
    byte: u8,
    offset: usize,
) -> Result<(), Error> {
    if byte == b'e' {
        let key = stack.top().current_key().map(<[u8]>::to_vec);
        let value = stack.top().pending_int;
        if !observer.hit_int(key.as_deref(), value) {
            return Err(Error::ObserverAbort);
        }
        stack.pop(observer)
    } else if is_digit(byte) {
        let f = stack.top_mut();
        f.pending_int = f
            .pending_int
            .wrapping_mul(10)
            .wrapping_add(digit_value(byte));
        Ok(())
    } else {
        Err(unexpected(byte, "INT", offset))
    }
}

fn step_str_len<O: Observer>(
    stack: &mut FrameStack,
    observer: &mut O,
    byte: u8,
    offset: usize,
) -> Result<(), Error> {
    if byte == b':' {
        if stack.top().pending_len == 0 {
            let key = stack.top().current_key().map(<[u8]>::to_vec);
            if !observer.hit_str(key.as_deref(), 0, &[], 0) {
                return Err(Error::ObserverAbort);
            }
            stack.pop(observer)
        } else {
            let f = stack.top_mut();
            f.token_kind = TokenKind::Str;
            f.pos = 0;
            let needed = f.pending_len + 1;
            f.ensure_strval_capacity(needed);
            Ok(())
        }
    } else if is_digit(byte) {
        let f = stack.top_mut();
        f.pending_len = f
            .pending_len
            .wrapping_mul(10)
            .wrapping_add(digit_value(byte) as usize);
        Ok(())
    } else {
        Err(unexpected(byte, "STR_LEN", offset))
    }
}

fn step_str<O: Observer>(stack: &mut FrameStack, observer: &mut O, byte: u8) -> Result<(), Error> {
    let f = stack.top_mut();
    f.ensure_strval_capacity(f.pos + 2);
    f.strval[f.pos] = byte;
    f.pos += 1;

    if f.pos == f.pending_len {
        f.strval[f.pos] = 0;
        let key = stack.top().current_key().map(<[u8]>::to_vec);
        let len = stack.top().pending_len;
        let bytes = stack.top().strval[..len].to_vec();
        if !observer.hit_str(key.as_deref(), len, &bytes, len) {
            return Err(Error::ObserverAbort);
        }
        stack.pop(observer)
    } else {
        Ok(())
    }
}

fn step_list<O: Observer>(
    stack: &mut FrameStack,
    observer: &mut O,
    byte: u8,
    offset: usize,
) -> Result<(), Error> {
    match byte {
        b'e' => stack.pop(observer),
        b'i' => {
            stack.push()?;
            let f = stack.top_mut();
            f.token_kind = TokenKind::Int;
            Ok(())
        }
        b'd' => {
            stack.push()?;
            stack.top_mut().token_kind = TokenKind::Dict;
            #[cfg(feature = "tracing")]
            trace!(depth = stack.depth(), key = ?Option::<&[u8]>::None, "dict_enter");
            if !observer.dict_enter(None) {
                return Err(Error::ObserverAbort);
            }
            Ok(())
        }
        b'l' => {
            stack.push()?;
            stack.top_mut().token_kind = TokenKind::List;
            #[cfg(feature = "tracing")]
            trace!(depth = stack.depth(), key = ?Option::<&[u8]>::None, "list_enter");
            if !observer.list_enter(None) {
                return Err(Error::ObserverAbort);
            }
            Ok(())
        }
        b if is_digit(b) => {
            stack.push()?;
            let f = stack.top_mut();
            f.token_kind = TokenKind::StrLen;
            f.pending_len = digit_value(b) as usize;
            Ok(())
        }
        other => Err(unexpected(other, "LIST", offset)),
    }
}

fn step_dict<O: Observer>(
    stack: &mut FrameStack,
    observer: &mut O,
    byte: u8,
    offset: usize,
) -> Result<(), Error> {
    match byte {
        b'e' => stack.pop(observer),
        b if is_digit(b) => {
            stack.push()?;
            let f = stack.top_mut();
            f.token_kind = TokenKind::DictKeyLen;
            f.pending_len = digit_value(b) as usize;
            Ok(())
        }
        other => Err(unexpected(other, "DICT", offset)),
    }
}

fn step_dict_keylen<O: Observer>(
    stack: &mut FrameStack,
    observer: &mut O,
    byte: u8,
    offset: usize,
) -> Result<(), Error> {
    if byte == b':' {
        let f = stack.top_mut();
        f.token_kind = TokenKind::DictKey;
        f.pos = 0;
        let needed = f.pending_len + 1;
        f.ensure_key_capacity(needed);
        Ok(())
    } else if is_digit(byte) {
        let f = stack.top_mut();
        f.pending_len = f
            .pending_len
            .wrapping_mul(10)
            .wrapping_add(digit_value(byte) as usize);
        Ok(())
    } else if byte == b'e' {
        // Defensive path for a key length cut short by the dict's own
        // terminator.
        stack.pop(observer)
    } else {
        Err(unexpected(byte, "DICT_KEYLEN", offset))
    }
}

fn step_dict_key<O: Observer>(
    stack: &mut FrameStack,
    _observer: &mut O,
    byte: u8,
) -> Result<(), Error> {
    let f = stack.top_mut();
    f.ensure_key_capacity(f.pos + 2);
    f.key[f.pos] = byte;
    f.pos += 1;

    if f.pos == f.pending_len {
        f.key[f.pos] = 0;
        f.key_len = f.pending_len;
        f.token_kind = TokenKind::DictVal;
        f.pos = 0;
        f.pending_len = 0;
        f.pending_int = 0;
    }
    Ok(())
}
