use std::ops::Not;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lit {
    pub var: u32,
    pub sign: bool,
}

impl Lit {
    pub fn new(var: u32, sign: bool) -> Self {
        Self { var, sign }
    }

    pub fn pos(var: u32) -> Self {
        Self::new(var, true)
    }

    pub fn neg(self) -> Self {
        Self {
            var: self.var,
            sign: !self.sign,
        }
    }

    /// Dense index usable for per-literal tables.
    pub fn code(self) -> usize {
        ((self.var as usize) << 1) | usize::from(self.sign)
    }

    pub fn from_dimacs(x: i64) -> Option<Self> {
        if x == 0 {
            return None;
        }
        let var = u32::try_from(x.unsigned_abs()).ok()?;
        Some(Self::new(var, x > 0))
    }

    pub fn to_dimacs(self) -> i64 {
        let v = i64::from(self.var);
        if self.sign { v } else { -v }
    }
}

impl Not for Lit {
    type Output = Lit;

    fn not(self) -> Lit {
        self.neg()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Value {
    True,
    False,
    Undef,
}

impl Value {
    pub fn of(v: Option<bool>) -> Self {
        match v {
            Some(true) => Value::True,
            Some(false) => Value::False,
            None => Value::Undef,
        }
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            Value::True => Some(true),
            Value::False => Some(false),
            Value::Undef => None,
        }
    }

    pub fn is_assigned(self) -> bool {
        self != Value::Undef
    }
}

impl Not for Value {
    type Output = Value;

    fn not(self) -> Value {
        match self {
            Value::True => Value::False,
            Value::False => Value::True,
            Value::Undef => Value::Undef,
        }
    }
}
