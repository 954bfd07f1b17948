// Execution engine for the C runner

use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::{AssignOp, BinOp, Expr, SourceLocation, Stmt, UnOp};
use rustc_hash::FxHashMap;

/// The signal produced by executing a statement: either control
/// continues, or a `return` is unwinding to the top frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Normal,
    Return(i64),
}

/// The tree-walking interpreter.
///
/// Holds the scope stack (innermost scope last), the buffered stdout
/// string, and the runtime warnings. Values are `i64`; arithmetic wraps
/// two's-complement via the `wrapping_*` family.
pub struct Interpreter {
    scopes: Vec<FxHashMap<String, i64>>,
    stdout: String,
    pub(crate) warnings: Vec<String>,
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter {
            scopes: Vec::new(),
            stdout: String::new(),
            warnings: Vec::new(),
        }
    }

    /// Execute the body of `main` from start to finish.
    ///
    /// A `return` anywhere in the body unwinds here and is absorbed; the
    /// scope stack is back at its pre-run depth on every exit path.
    pub fn run(&mut self, body: &[Stmt]) -> Result<(), RuntimeError> {
        self.execute_block(body)?;
        Ok(())
    }

    /// The buffered stdout accumulated so far
    pub fn output(&self) -> &str {
        &self.stdout
    }

    /// Runtime warnings accumulated so far, in execution order
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Drain the buffered stdout
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.stdout)
    }

    /// Drain the accumulated warnings
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    /// Current scope-stack depth (zero when no program is running)
    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    // ===== Scope discipline =====

    fn enter_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    fn exit_scope(&mut self) {
        self.scopes.pop();
    }

    /// Declare into the innermost scope. Redeclaration in the same scope
    /// replaces the value.
    fn declare(&mut self, name: &str, value: i64) -> Result<(), RuntimeError> {
        let scope = self.scopes.last_mut().ok_or_else(|| RuntimeError::Internal {
            message: "declaration outside any scope".to_string(),
        })?;
        scope.insert(name.to_string(), value);
        Ok(())
    }

    /// Resolve a name, innermost scope first
    fn lookup(&self, name: &str) -> Option<i64> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
    }

    /// Write to an already-declared name, innermost scope first.
    /// Returns false when no scope declares the name.
    fn assign(&mut self, name: &str, value: i64) -> bool {
        for scope in self.scopes.iter_mut().rev() {
            if let Some(slot) = scope.get_mut(name) {
                *slot = value;
                return true;
            }
        }
        false
    }

    // ===== Statement execution =====

    /// Execute a statement list in a fresh scope, popping it on every
    /// exit path including error unwinds
    fn execute_block(&mut self, statements: &[Stmt]) -> Result<ControlFlow, RuntimeError> {
        self.enter_scope();
        let result = self.execute_statements(statements);
        self.exit_scope();
        result
    }

    /// Execute statements in the current scope until one signals
    fn execute_statements(&mut self, statements: &[Stmt]) -> Result<ControlFlow, RuntimeError> {
        for stmt in statements {
            match self.execute_statement(stmt)? {
                ControlFlow::Normal => {}
                flow => return Ok(flow),
            }
        }
        Ok(ControlFlow::Normal)
    }

    /// Execute a single statement
    fn execute_statement(&mut self, stmt: &Stmt) -> Result<ControlFlow, RuntimeError> {
        match stmt {
            Stmt::Declaration { declarators, .. } => {
                // Declarators evaluate left to right, so later
                // initializers can read earlier names.
                for declarator in declarators {
                    let value = match &declarator.init {
                        Some(expr) => self.eval_expr(expr)?,
                        None => 0,
                    };
                    self.declare(&declarator.name, value)?;
                }
                Ok(ControlFlow::Normal)
            }

            Stmt::Assignment {
                name,
                op,
                value,
                location,
            } => {
                self.execute_assignment(name, *op, value, *location)?;
                Ok(ControlFlow::Normal)
            }

            Stmt::Printf { format, args, .. } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval_expr(arg)?);
                }
                let rendered = self.format_printf(format, &values);
                self.stdout.push_str(&rendered);
                Ok(ControlFlow::Normal)
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                if self.eval_expr(condition)? != 0 {
                    self.execute_block(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute_block(else_branch)
                } else {
                    Ok(ControlFlow::Normal)
                }
            }

            Stmt::While {
                condition, body, ..
            } => {
                while self.eval_expr(condition)? != 0 {
                    match self.execute_block(body)? {
                        ControlFlow::Normal => {}
                        flow => return Ok(flow),
                    }
                }
                Ok(ControlFlow::Normal)
            }

            Stmt::For {
                init,
                condition,
                increment,
                body,
                ..
            } => {
                // The for header gets its own scope around the whole
                // loop, popped on every exit path.
                self.enter_scope();
                let result = self.execute_for(
                    init.as_deref(),
                    condition.as_ref(),
                    increment.as_deref(),
                    body,
                );
                self.exit_scope();
                result
            }

            Stmt::Return { expr, .. } => {
                let value = match expr {
                    Some(expr) => self.eval_expr(expr)?,
                    None => 0,
                };
                Ok(ControlFlow::Return(value))
            }

            Stmt::Block { statements, .. } => self.execute_block(statements),

            Stmt::Empty { .. } => Ok(ControlFlow::Normal),
        }
    }

    /// Loop body of a `for`, running inside the header scope
    fn execute_for(
        &mut self,
        init: Option<&Stmt>,
        condition: Option<&Expr>,
        increment: Option<&Stmt>,
        body: &[Stmt],
    ) -> Result<ControlFlow, RuntimeError> {
        if let Some(init) = init {
            self.execute_statement(init)?;
        }

        loop {
            if let Some(condition) = condition {
                if self.eval_expr(condition)? == 0 {
                    break;
                }
            }

            match self.execute_block(body)? {
                ControlFlow::Normal => {}
                flow => return Ok(flow),
            }

            if let Some(increment) = increment {
                self.execute_statement(increment)?;
            }
        }

        Ok(ControlFlow::Normal)
    }

    /// Plain and compound assignment. Declaration and assignment are
    /// distinct: writing to an undeclared name is a runtime error.
    fn execute_assignment(
        &mut self,
        name: &str,
        op: AssignOp,
        value: &Expr,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        let rhs = self.eval_expr(value)?;

        let new_value = match op {
            AssignOp::Assign => rhs,
            compound => {
                let current = self.lookup(name).ok_or_else(|| RuntimeError::UndefinedVariable {
                    name: name.to_string(),
                    location,
                })?;
                match compound {
                    AssignOp::AddAssign => current.wrapping_add(rhs),
                    AssignOp::SubAssign => current.wrapping_sub(rhs),
                    AssignOp::MulAssign => current.wrapping_mul(rhs),
                    AssignOp::DivAssign => {
                        if rhs == 0 {
                            return Err(RuntimeError::DivisionError {
                                operation: "Division by zero".to_string(),
                                location,
                            });
                        }
                        current.wrapping_div(rhs)
                    }
                    AssignOp::ModAssign => {
                        if rhs == 0 {
                            return Err(RuntimeError::DivisionError {
                                operation: "Modulo by zero".to_string(),
                                location,
                            });
                        }
                        current.wrapping_rem(rhs)
                    }
                    AssignOp::Assign => unreachable!("handled above"),
                }
            }
        };

        if !self.assign(name, new_value) {
            return Err(RuntimeError::UndefinedVariable {
                name: name.to_string(),
                location,
            });
        }
        Ok(())
    }

    // ===== Expression evaluation =====

    fn eval_expr(&mut self, expr: &Expr) -> Result<i64, RuntimeError> {
        match expr {
            Expr::IntLiteral(n, _) => Ok(*n),

            Expr::Variable(name, location) => {
                self.lookup(name).ok_or_else(|| RuntimeError::UndefinedVariable {
                    name: name.clone(),
                    location: *location,
                })
            }

            Expr::Unary { op, operand, .. } => {
                let value = self.eval_expr(operand)?;
                Ok(match op {
                    UnOp::Plus => value,
                    UnOp::Neg => value.wrapping_neg(),
                    UnOp::Not => i64::from(value == 0),
                })
            }

            Expr::Binary {
                op,
                left,
                right,
                location,
            } => {
                // Both sides are always evaluated, including for && and
                // ||: the subset has no short-circuit semantics.
                let lhs = self.eval_expr(left)?;
                let rhs = self.eval_expr(right)?;
                Self::eval_binary(*op, lhs, rhs, *location)
            }
        }
    }

    fn eval_binary(
        op: BinOp,
        lhs: i64,
        rhs: i64,
        location: SourceLocation,
    ) -> Result<i64, RuntimeError> {
        let value = match op {
            BinOp::Add => lhs.wrapping_add(rhs),
            BinOp::Sub => lhs.wrapping_sub(rhs),
            BinOp::Mul => lhs.wrapping_mul(rhs),
            BinOp::Div => {
                if rhs == 0 {
                    return Err(RuntimeError::DivisionError {
                        operation: "Division by zero".to_string(),
                        location,
                    });
                }
                lhs.wrapping_div(rhs)
            }
            BinOp::Mod => {
                if rhs == 0 {
                    return Err(RuntimeError::DivisionError {
                        operation: "Modulo by zero".to_string(),
                        location,
                    });
                }
                lhs.wrapping_rem(rhs)
            }
            BinOp::Eq => i64::from(lhs == rhs),
            BinOp::Ne => i64::from(lhs != rhs),
            BinOp::Lt => i64::from(lhs < rhs),
            BinOp::Le => i64::from(lhs <= rhs),
            BinOp::Gt => i64::from(lhs > rhs),
            BinOp::Ge => i64::from(lhs >= rhs),
            BinOp::And => i64::from(lhs != 0 && rhs != 0),
            BinOp::Or => i64::from(lhs != 0 || rhs != 0),
        };
        Ok(value)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::Parser;

    fn run_program(source: &str) -> (Interpreter, Result<(), RuntimeError>) {
        let mut parser = Parser::new(source).expect("lexing failed");
        let program = parser.parse_program().expect("parsing failed");
        let mut interpreter = Interpreter::new();
        let result = interpreter.run(&program.body);
        (interpreter, result)
    }

    #[test]
    fn test_declaration_defaults_to_zero() {
        let (interp, result) = run_program("int main(void) { int x; printf(\"%d\", x); }");
        result.unwrap();
        assert_eq!(interp.output(), "0");
    }

    #[test]
    fn test_inner_scope_shadows_outer() {
        let source = r#"
            int main(void) {
                int x = 1;
                { int x = 2; printf("%d", x); }
                printf("%d", x);
            }
        "#;
        let (interp, result) = run_program(source);
        result.unwrap();
        assert_eq!(interp.output(), "21");
    }

    #[test]
    fn test_assignment_reaches_outer_scope() {
        let source = r#"
            int main(void) {
                int x = 1;
                { x = 5; }
                printf("%d", x);
            }
        "#;
        let (interp, result) = run_program(source);
        result.unwrap();
        assert_eq!(interp.output(), "5");
    }

    #[test]
    fn test_redeclaration_in_same_scope_wins() {
        let source = "int main(void) { int x = 1; int x = 2; printf(\"%d\", x); }";
        let (interp, result) = run_program(source);
        result.unwrap();
        assert_eq!(interp.output(), "2");
    }

    #[test]
    fn test_undefined_variable_read() {
        let (_, result) = run_program("int main(void) { int x = y + 1; }");
        match result.unwrap_err() {
            RuntimeError::UndefinedVariable { name, location } => {
                assert_eq!(name, "y");
                assert_eq!(location.line, 1);
            }
            other => panic!("Expected undefined variable, got {:?}", other),
        }
    }

    #[test]
    fn test_assignment_to_undeclared_name() {
        let (_, result) = run_program("int main(void) { x = 3; }");
        assert!(matches!(
            result.unwrap_err(),
            RuntimeError::UndefinedVariable { .. }
        ));
    }

    #[test]
    fn test_loop_variable_not_visible_after_for() {
        let source = r#"
            int main(void) {
                for (int i = 0; i < 3; i += 1) { ; }
                i = 1;
            }
        "#;
        let (_, result) = run_program(source);
        assert!(matches!(
            result.unwrap_err(),
            RuntimeError::UndefinedVariable { ref name, .. } if name == "i"
        ));
    }

    #[test]
    fn test_return_unwinds_through_loops() {
        let source = r#"
            int main(void) {
                int i = 0;
                while (1) {
                    i += 1;
                    if (i == 3) { return i; }
                }
                printf("unreachable");
            }
        "#;
        let (interp, result) = run_program(source);
        result.unwrap();
        assert_eq!(interp.output(), "");
        assert_eq!(interp.scope_depth(), 0);
    }

    #[test]
    fn test_scope_depth_restored_after_error() {
        let source = r#"
            int main(void) {
                int x = 1;
                if (x) {
                    while (x) {
                        x = x / 0;
                    }
                }
            }
        "#;
        let (interp, result) = run_program(source);
        assert!(result.is_err());
        assert_eq!(interp.scope_depth(), 0);
    }

    #[test]
    fn test_logical_operators_evaluate_both_sides() {
        // No short circuit: the division on the right of && runs even
        // though the left side is already zero.
        let source = "int main(void) { int x = 0; int y = x && (1 / x); }";
        let (_, result) = run_program(source);
        assert!(matches!(
            result.unwrap_err(),
            RuntimeError::DivisionError { .. }
        ));
    }

    #[test]
    fn test_logic_and_comparison_results() {
        let source = r#"
            int main(void) {
                printf("%d%d%d%d", 2 && 3, 2 && 0, 0 || 5, 0 || 0);
                printf("%d%d", 3 < 5, 5 < 3);
                printf("%d%d", !0, !7);
            }
        "#;
        let (interp, result) = run_program(source);
        result.unwrap();
        assert_eq!(interp.output(), "10101010");
    }

    #[test]
    fn test_wrapping_arithmetic() {
        // i64 overflow wraps two's-complement instead of trapping.
        let source = r#"
            int main(void) {
                int big = 9223372036854775807;
                big += 1;
                printf("%d", big);
            }
        "#;
        let (interp, result) = run_program(source);
        result.unwrap();
        assert_eq!(interp.output(), "-9223372036854775808");
    }

    #[test]
    fn test_modulo_by_zero_message() {
        let (_, result) = run_program("int main(void) { int x = 7 % 0; }");
        match result.unwrap_err() {
            RuntimeError::DivisionError { operation, .. } => {
                assert!(operation.contains("Modulo"));
            }
            other => panic!("Expected division error, got {:?}", other),
        }
    }
}
