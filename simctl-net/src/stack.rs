//! Byte-oriented LIFO stack used as a message payload.
//!
//! Values are appended to the tail and popped from the tail. Strings are
//! written as UTF-8 bytes followed by a little-endian `u32` length so the
//! length is the first thing a pop sees.

use serde::{Deserialize, Serialize};

/// Failure popping a value off a [`BytesStack`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackError {
    /// Fewer bytes remain than the value needs.
    Underflow { needed: usize, available: usize },
    /// A popped string was not valid UTF-8.
    InvalidUtf8,
}

impl std::fmt::Display for StackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Underflow { needed, available } => {
                write!(f, "stack underflow: needed {} bytes, {} available", needed, available)
            }
            Self::InvalidUtf8 => write!(f, "popped string is not valid UTF-8"),
        }
    }
}

impl std::error::Error for StackError {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BytesStack {
    data: Vec<u8>,
}

impl BytesStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Number of bytes on the stack.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn push_u32(&mut self, value: u32) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    pub fn pop_u32(&mut self) -> Result<u32, StackError> {
        let bytes = self.take_tail(4)?;
        let mut buf = [0u8; 4];
        buf.copy_from_slice(&bytes);
        Ok(u32::from_le_bytes(buf))
    }

    pub fn push_bool(&mut self, value: bool) {
        self.data.push(u8::from(value));
    }

    pub fn pop_bool(&mut self) -> Result<bool, StackError> {
        let bytes = self.take_tail(1)?;
        Ok(bytes[0] != 0)
    }

    pub fn push_string(&mut self, value: &str) {
        self.data.extend_from_slice(value.as_bytes());
        self.push_u32(value.len() as u32);
    }

    /// Pop a string. On error the stack is left untouched.
    pub fn pop_string(&mut self) -> Result<String, StackError> {
        let available = self.data.len();
        if available < 4 {
            return Err(StackError::Underflow { needed: 4, available });
        }
        let mut len_buf = [0u8; 4];
        len_buf.copy_from_slice(&self.data[available - 4..]);
        let len = u32::from_le_bytes(len_buf) as usize;

        let needed = len.saturating_add(4);
        if needed > available {
            return Err(StackError::Underflow { needed, available });
        }
        let start = available - needed;
        let value = std::str::from_utf8(&self.data[start..available - 4])
            .map_err(|_| StackError::InvalidUtf8)?
            .to_string();
        self.data.truncate(start);
        Ok(value)
    }

    fn take_tail(&mut self, n: usize) -> Result<Vec<u8>, StackError> {
        let available = self.data.len();
        if n > available {
            return Err(StackError::Underflow { needed: n, available });
        }
        Ok(self.data.split_off(available - n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_pop_in_reverse_push_order() {
        let mut stack = BytesStack::new();
        stack.push_string("first");
        stack.push_string("second");
        assert_eq!(stack.pop_string().unwrap(), "second");
        assert_eq!(stack.pop_string().unwrap(), "first");
        assert!(stack.is_empty());
    }

    #[test]
    fn mixed_values() {
        let mut stack = BytesStack::new();
        stack.push_string("héllo");
        stack.push_u32(7);
        stack.push_bool(true);
        stack.push_string("");
        assert_eq!(stack.pop_string().unwrap(), "");
        assert!(stack.pop_bool().unwrap());
        assert_eq!(stack.pop_u32().unwrap(), 7);
        assert_eq!(stack.pop_string().unwrap(), "héllo");
        assert!(stack.is_empty());
    }

    #[test]
    fn underflow_on_empty() {
        let mut stack = BytesStack::new();
        assert_eq!(
            stack.pop_string(),
            Err(StackError::Underflow { needed: 4, available: 0 })
        );
        assert!(stack.pop_bool().is_err());
    }

    #[test]
    fn truncated_string_leaves_stack_intact() {
        let mut stack = BytesStack::new();
        stack.push_u32(100);
        let before = stack.clone();
        assert_eq!(
            stack.pop_string(),
            Err(StackError::Underflow { needed: 104, available: 4 })
        );
        assert_eq!(stack, before);
    }

    #[test]
    fn invalid_utf8() {
        let mut stack = BytesStack::from_bytes(vec![0xff, 0xfe, 2, 0, 0, 0]);
        assert_eq!(stack.pop_string(), Err(StackError::InvalidUtf8));
        assert_eq!(stack.len(), 6);
    }

    #[test]
    fn bytes_survive_rebuild() {
        let mut stack = BytesStack::new();
        stack.push_string("cone");
        let mut rebuilt = BytesStack::from_bytes(stack.as_bytes().to_vec());
        assert_eq!(rebuilt.pop_string().unwrap(), "cone");
    }
}
