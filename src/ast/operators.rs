use serde::{Deserialize, Serialize};

/// The statement kind a query assembles into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Statement {
    /// SELECT query
    #[default]
    Select,
    /// INSERT query
    Insert,
    /// UPDATE query
    Update,
    /// DELETE query
    Delete,
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Statement::Select => write!(f, "SELECT"),
            Statement::Insert => write!(f, "INSERT"),
            Statement::Update => write!(f, "UPDATE"),
            Statement::Delete => write!(f, "DELETE"),
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    /// Equal (=)
    Eq,
    /// Not equal (<>)
    Ne,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Le,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Ge,
    /// Logical AND
    And,
    /// Logical OR
    Or,
    /// Addition (+)
    Add,
    /// Subtraction (-)
    Sub,
    /// Multiplication (*)
    Mul,
    /// Division (/)
    Div,
    /// Modulo (%)
    Rem,
    /// String concatenation, spelled per dialect
    Concat,
    /// Membership (IN)
    In,
}

impl BinaryOp {
    /// SQL token for operators that are spelled the same everywhere.
    pub fn token(self) -> &'static str {
        match self {
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "<>",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Concat => "||",
            BinaryOp::In => "IN",
        }
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    /// `a op (b op c)` may drop its parentheses.
    pub fn is_associative(self) -> bool {
        matches!(
            self,
            BinaryOp::And | BinaryOp::Or | BinaryOp::Add | BinaryOp::Mul | BinaryOp::Concat
        )
    }
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Logical NOT
    Not,
    /// Arithmetic negation
    Negate,
}

/// Aggregate functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregateKind {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl std::fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregateKind::Count => write!(f, "COUNT"),
            AggregateKind::Sum => write!(f, "SUM"),
            AggregateKind::Avg => write!(f, "AVG"),
            AggregateKind::Min => write!(f, "MIN"),
            AggregateKind::Max => write!(f, "MAX"),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "ASC"),
            SortOrder::Desc => write!(f, "DESC"),
        }
    }
}

/// Abstract scalar functions; their SQL spelling comes from the function table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctionKind {
    // String
    Length,
    Upper,
    Lower,
    Trim,
    TrimStart,
    TrimEnd,
    /// Zero-based start, optional length
    Substring,
    /// Zero-based result, optional zero-based start
    IndexOf,
    Replace,
    Contains,
    StartsWith,
    EndsWith,
    PadLeft,
    // Math
    Abs,
    Ceiling,
    Floor,
    Round,
    Power,
    Sqrt,
    Sign,
    Truncate,
    // Date
    Now,
    Year,
    Month,
    Day,
}

impl FunctionKind {
    pub fn name(self) -> &'static str {
        match self {
            FunctionKind::Length => "length",
            FunctionKind::Upper => "upper",
            FunctionKind::Lower => "lower",
            FunctionKind::Trim => "trim",
            FunctionKind::TrimStart => "trimStart",
            FunctionKind::TrimEnd => "trimEnd",
            FunctionKind::Substring => "substring",
            FunctionKind::IndexOf => "indexOf",
            FunctionKind::Replace => "replace",
            FunctionKind::Contains => "contains",
            FunctionKind::StartsWith => "startsWith",
            FunctionKind::EndsWith => "endsWith",
            FunctionKind::PadLeft => "padLeft",
            FunctionKind::Abs => "abs",
            FunctionKind::Ceiling => "ceiling",
            FunctionKind::Floor => "floor",
            FunctionKind::Round => "round",
            FunctionKind::Power => "power",
            FunctionKind::Sqrt => "sqrt",
            FunctionKind::Sign => "sign",
            FunctionKind::Truncate => "truncate",
            FunctionKind::Now => "now",
            FunctionKind::Year => "year",
            FunctionKind::Month => "month",
            FunctionKind::Day => "day",
        }
    }
}

impl std::fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
