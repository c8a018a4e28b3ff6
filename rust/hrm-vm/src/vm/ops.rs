//! Register access, arithmetic, and branch helpers for the VM.

use super::{VmError, VM};
use hrm_core::{RegisterRef, Value};

fn describe(value: &Value) -> String {
    format!("{} {}", value.type_name(), value.display_quoted())
}

impl VM {
    /// Key actually addressed by `register`: the key itself, or for an
    /// indirect operand the value stored under it.
    fn resolve_key(&self, register: &RegisterRef) -> Result<Value, VmError> {
        if !register.indirect {
            return Ok(register.key.clone());
        }
        self.registers
            .get(&register.key)
            .cloned()
            .ok_or_else(|| VmError::RegisterNotSet { key: register.key.clone() })
    }

    pub(super) fn read_register(&self, register: &RegisterRef) -> Result<Value, VmError> {
        let key = self.resolve_key(register)?;
        match self.registers.get(&key) {
            Some(value) => Ok(value.clone()),
            None => Err(VmError::RegisterNotSet { key }),
        }
    }

    pub(super) fn write_register(&mut self, register: &RegisterRef, value: Value) -> Result<(), VmError> {
        let key = self.resolve_key(register)?;
        self.registers.insert(key, value);
        Ok(())
    }

    pub(super) fn held_value(&self, instruction: &str) -> Result<&Value, VmError> {
        self.held
            .as_ref()
            .ok_or_else(|| VmError::NoValue { instruction: instruction.to_string() })
    }

    pub(super) fn take_held(&mut self, instruction: &str) -> Result<Value, VmError> {
        self.held
            .take()
            .ok_or_else(|| VmError::NoValue { instruction: instruction.to_string() })
    }

    pub(super) fn held_int(&self, instruction: &str) -> Result<i64, VmError> {
        let value = self.held_value(instruction)?;
        value.as_int().ok_or_else(|| VmError::TypeMismatch {
            instruction: instruction.to_string(),
            operand: "held value".to_string(),
            expected: "integer".to_string(),
            found: describe(value),
        })
    }

    fn register_int(&self, instruction: &str, register: &RegisterRef) -> Result<i64, VmError> {
        let value = self.read_register(register)?;
        value.as_int().ok_or_else(|| VmError::TypeMismatch {
            instruction: instruction.to_string(),
            operand: format!("register {}", register),
            expected: "integer".to_string(),
            found: describe(&value),
        })
    }

    /// `held <- held op register`, integers only.
    pub(super) fn arithmetic(
        &mut self,
        instruction: &str,
        register: &RegisterRef,
        op: fn(i64, i64) -> Option<i64>,
    ) -> Result<(), VmError> {
        let lhs = self.held_int(instruction)?;
        let rhs = self.register_int(instruction, register)?;
        let result = op(lhs, rhs)
            .ok_or_else(|| VmError::ArithmeticOverflow { instruction: instruction.to_string() })?;
        self.held = Some(Value::Int(result));
        Ok(())
    }

    /// Add `delta` to an existing register and hold the new value.
    pub(super) fn bump(&mut self, instruction: &str, register: &RegisterRef, delta: i64) -> Result<(), VmError> {
        let current = self.register_int(instruction, register)?;
        let updated = current
            .checked_add(delta)
            .ok_or_else(|| VmError::ArithmeticOverflow { instruction: instruction.to_string() })?;
        self.write_register(register, Value::Int(updated))?;
        self.held = Some(Value::Int(updated));
        Ok(())
    }

    pub(super) fn jump_target(&self, label: &str) -> Result<usize, VmError> {
        self.program
            .label_index(label)
            .ok_or_else(|| VmError::UnknownLabel { label: label.to_string() })
    }
}
