// Scope-based type inference. It only reports: no program is rejected here,
// and nothing downstream reads the table.

use crate::{ast::*, span::Span, Type};
use indexmap::IndexMap;

#[derive(PartialEq, Clone, Copy, Debug)]
pub struct Symbol {
    pub symbol_type: Type,
    /// Where the name was first bound
    pub span: Span,
}

/// One frame of the stack: the global frame, a function, or an explicit
/// `{ }` block. if/while bodies don't get one
#[derive(PartialEq, Clone, Debug)]
pub struct Scope {
    pub name: String,
    pub depth: usize,
    pub symbols: IndexMap<String, Symbol>,
}

/// Every scope ever entered stays in `scopes` (in the order they were
/// entered) so the whole table can be reported afterwards; `open` is the
/// stack of indices lookups walk
#[derive(PartialEq, Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    open: Vec<usize>,
}

impl SymbolTable {
    pub fn new() -> Self {
        let global = Scope { name: "global".to_string(), depth: 0, symbols: IndexMap::new() };
        Self { scopes: vec![global], open: vec![0] }
    }
    pub fn enter(&mut self, name: &str) {
        let depth = self.open.len();
        debug!("entering scope {} at depth {}", name, depth);
        self.open.push(self.scopes.len());
        self.scopes.push(Scope { name: name.to_string(), depth, symbols: IndexMap::new() });
    }
    /// The global scope is never left
    pub fn leave(&mut self) {
        if self.open.len() > 1 {
            self.open.pop();
        }
    }
    /// Binds in the innermost open scope, replacing a binding there
    pub fn declare(&mut self, name: &str, symbol_type: Type, span: Span) {
        let current = self.open[self.open.len() - 1];
        self.scopes[current].symbols.insert(name.to_string(), Symbol { symbol_type, span });
    }
    /// Innermost-out through the open scopes
    pub fn lookup(&self, name: &str) -> Option<Type> {
        self.open
            .iter()
            .rev()
            .filter_map(|&i| self.scopes[i].symbols.get(name))
            .map(|symbol| symbol.symbol_type)
            .next()
    }
    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }
    /// Every binding from every scope, flattened. A name bound in more than
    /// one scope keeps its position from the first and type from the last
    pub fn dump(&self) -> IndexMap<String, Type> {
        let mut merged = IndexMap::new();
        for scope in &self.scopes {
            for (name, symbol) in &scope.symbols {
                merged.insert(name.clone(), symbol.symbol_type);
            }
        }
        merged
    }
}
impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
impl std::fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for scope in &self.scopes {
            let indent = "  ".repeat(scope.depth);
            writeln!(f, "{}{}", indent, scope.name)?;
            for (name, symbol) in &scope.symbols {
                writeln!(f, "{}  {} : {} ({})", indent, name, symbol.symbol_type, symbol.span)?;
            }
        }
        Ok(())
    }
}

/// Bottom up, no unification
pub fn infer(expr: &Expression, table: &SymbolTable) -> Type {
    match expr {
        Expression::Number(Number::Float(_)) => Type::Float,
        Expression::Number(Number::Int(_)) | Expression::Number(Number::Bool(_)) => Type::Int,
        Expression::String(_) => Type::Str,
        Expression::Char(_) => Type::Char,
        // Unbound names are assumed int
        Expression::VarRef(id) => table.lookup(&id.name).unwrap_or(Type::Int),
        Expression::BinOp(bin) => {
            let (left, right) = (infer(&bin.left, table), infer(&bin.right, table));
            if left == Type::Float || right == Type::Float {
                Type::Float
            } else if left == Type::Str || right == Type::Str {
                Type::Str
            } else {
                Type::Int
            }
        }
        Expression::FuncCall(_) => Type::Int,
    }
}

fn analyze_block(block: &Block, table: &mut SymbolTable) {
    for stmt in &block.stmts {
        match stmt {
            Statement::VarAssign(assign) => {
                let found = infer(&assign.expr, table);
                // First assignment declares, later ones don't retype
                if table.lookup(&assign.name.name).is_none() {
                    table.declare(&assign.name.name, found, assign.name.span);
                }
            }
            // Same frame as the surrounding code
            Statement::If(if_stmt) => {
                analyze_block(&if_stmt.then_block, table);
                if let Some(else_block) = &if_stmt.else_block {
                    analyze_block(else_block, table);
                }
            }
            Statement::While(while_stmt) => analyze_block(&while_stmt.body, table),
            Statement::Block(inner) => {
                table.enter("block");
                analyze_block(inner, table);
                table.leave();
            }
            Statement::Print(_) | Statement::Return(_) | Statement::Expr(_) => (),
        }
    }
}

pub fn analyze(program: &Program) -> SymbolTable {
    let mut table = SymbolTable::new();
    for func in &program.funcs {
        table.declare(&func.name.name, Type::Func, func.name.span);
        table.enter(&func.name.name);
        for param in &func.params {
            table.declare(&param.name, Type::Int, param.span);
        }
        analyze_block(&func.body, &mut table);
        table.leave();
    }
    table
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::passes::{parse, tokenize};

    fn analyze_src(src: &str) -> SymbolTable {
        analyze(&parse(tokenize(src)).expect("test program parse error"))
    }
    fn types_in(table: &SymbolTable, scope: usize) -> Vec<(String, Type)> {
        table.scopes()[scope].symbols.iter().map(|(n, s)| (n.clone(), s.symbol_type)).collect()
    }

    #[test]
    fn literal_types() {
        let table = analyze_src(
            r#"func main() { a = 1; b = 2.5; c = "s"; d = 'c'; e = true; f = g(1); }"#,
        );
        assert_eq!(
            types_in(&table, 1),
            vec![
                ("a".to_string(), Type::Int),
                ("b".to_string(), Type::Float),
                ("c".to_string(), Type::Str),
                ("d".to_string(), Type::Char),
                ("e".to_string(), Type::Int),
                ("f".to_string(), Type::Int),
            ]
        );
    }
    #[test]
    fn binary_types() {
        let table = analyze_src(
            r#"func main() { a = 1 + 2.0; b = "s" - 1; c = 'c' + 1; d = b * 2.5; e = nowhere + 1; }"#,
        );
        assert_eq!(
            types_in(&table, 1),
            vec![
                ("a".to_string(), Type::Float),
                ("b".to_string(), Type::Str),
                ("c".to_string(), Type::Int),
                ("d".to_string(), Type::Float),
                ("e".to_string(), Type::Int),
            ]
        );
    }
    #[test]
    fn functions_and_params() {
        let table = analyze_src("func f(a, b) { c = a; } func main() { x = 1.5; }");
        assert_eq!(types_in(&table, 0), vec![("f".to_string(), Type::Func), ("main".to_string(), Type::Func)]);
        assert_eq!(
            types_in(&table, 1),
            vec![("a".to_string(), Type::Int), ("b".to_string(), Type::Int), ("c".to_string(), Type::Int)]
        );
        assert_eq!(table.scopes()[2].name, "main");
        assert_eq!(table.scopes()[2].depth, 1);
    }
    #[test]
    fn first_assignment_wins() {
        let table = analyze_src(r#"func main() { x = 1; x = "now a string"; }"#);
        assert_eq!(table.dump()["x"], Type::Int);
    }
    #[test]
    fn if_and_while_share_the_function_scope() {
        let table = analyze_src("func main() { if (1) { x = 2.0; } while (1) { y = 'c'; } z = x; }");
        assert_eq!(table.scopes().len(), 2);
        assert_eq!(
            types_in(&table, 1),
            vec![("x".to_string(), Type::Float), ("y".to_string(), Type::Char), ("z".to_string(), Type::Float)]
        );
    }
    #[test]
    fn explicit_blocks_get_a_scope() {
        let table = analyze_src(r#"func main() { x = 1; { x = "s"; y = 2.0; } z = y; }"#);
        assert_eq!(table.scopes().len(), 3);
        assert_eq!(table.scopes()[2].depth, 2);
        // x already visible from the block, so only y is bound there
        assert_eq!(types_in(&table, 2), vec![("y".to_string(), Type::Float)]);
        // y is gone again once the block closes
        assert_eq!(
            types_in(&table, 1),
            vec![("x".to_string(), Type::Int), ("z".to_string(), Type::Int)]
        );
    }
    #[test]
    fn lookup_walks_outward() {
        let mut table = SymbolTable::new();
        table.declare("g", Type::Func, Span::new());
        table.enter("f");
        table.declare("x", Type::Str, Span::new());
        table.enter("block");
        assert_eq!(table.lookup("x"), Some(Type::Str));
        assert_eq!(table.lookup("g"), Some(Type::Func));
        assert_eq!(table.lookup("nope"), None);
        table.leave();
        table.leave();
        assert_eq!(table.lookup("x"), None);
        table.leave();
        assert_eq!(table.lookup("g"), Some(Type::Func));
    }
    #[test]
    fn report() {
        let table = analyze_src("func main() {\n  x = 1;\n  { y = 2.0; }\n}");
        assert_eq!(
            table.to_string(),
            "global\n  main : func (1:6)\n  main\n    x : int (2:3)\n    block\n      y : float (3:5)\n"
        );
    }
}
