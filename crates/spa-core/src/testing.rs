//! Builds a knowledge base from a nested program description.
//!
//! This stands in for the extraction stage in tests: statements are numbered in textual order
//! across procedures, base relations are added, every closure is computed in full and set once,
//! and Uses/Modifies facts are propagated through containers and calls.

use crate::{Pkb, PkbConfig, PkbError, StatementKind, StmtNo};
use spa_parser::{ExprError, NormalizedExpr};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Pkb(#[from] PkbError),
    #[error(transparent)]
    Expr(#[from] ExprError),
    #[error("Call to unknown procedure: {0}")]
    UnknownProcedure(String),
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Read(String),
    Print(String),
    Assign { variable: String, expr: String },
    Call(String),
    While { condition: Vec<String>, body: Vec<Stmt> },
    If {
        condition: Vec<String>,
        then_branch: Vec<Stmt>,
        else_branch: Vec<Stmt>,
    },
}

pub fn read(variable: &str) -> Stmt {
    Stmt::Read(variable.to_string())
}

pub fn print(variable: &str) -> Stmt {
    Stmt::Print(variable.to_string())
}

pub fn assign(variable: &str, expr: &str) -> Stmt {
    Stmt::Assign {
        variable: variable.to_string(),
        expr: expr.to_string(),
    }
}

pub fn call(procedure: &str) -> Stmt {
    Stmt::Call(procedure.to_string())
}

pub fn while_loop(condition: &[&str], body: Vec<Stmt>) -> Stmt {
    Stmt::While {
        condition: condition.iter().map(|v| v.to_string()).collect(),
        body,
    }
}

pub fn if_else(condition: &[&str], then_branch: Vec<Stmt>, else_branch: Vec<Stmt>) -> Stmt {
    Stmt::If {
        condition: condition.iter().map(|v| v.to_string()).collect(),
        then_branch,
        else_branch,
    }
}

struct Node {
    stmt: StmtNo,
    kind: StatementKind,
    uses: Vec<String>,
    modifies: Vec<String>,
    constants: Vec<String>,
    callee: Option<String>,
    pattern: Option<(String, NormalizedExpr)>,
    lists: Vec<Vec<Node>>,
}

impl Node {
    fn nested(&self) -> impl Iterator<Item = &Node> {
        self.lists.iter().flatten()
    }

    fn collect_stmts(&self, out: &mut HashSet<StmtNo>) {
        for child in self.nested() {
            out.insert(child.stmt);
            child.collect_stmts(out);
        }
    }
}

#[derive(Default)]
pub struct ProgramBuilder {
    config: PkbConfig,
    procedures: Vec<(String, Vec<Stmt>)>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PkbConfig) -> Self {
        Self {
            config,
            procedures: Vec::new(),
        }
    }

    pub fn procedure(mut self, name: &str, body: Vec<Stmt>) -> Self {
        self.procedures.push((name.to_string(), body));
        self
    }

    pub fn build(self) -> Result<Pkb, BuildError> {
        let mut pkb = Pkb::with_config(self.config.clone());
        self.build_into(&mut pkb)?;
        Ok(pkb)
    }

    /// Populates an existing store, which must have been reset if it held another program.
    pub fn build_into(&self, pkb: &mut Pkb) -> Result<(), BuildError> {
        let mut next = 1;
        let mut procedures = Vec::new();
        for (name, body) in &self.procedures {
            procedures.push((name.clone(), number_list(body, &mut next)?));
        }

        let names: HashSet<&str> = procedures.iter().map(|(n, _)| n.as_str()).collect();
        for (name, body) in &procedures {
            pkb.add_procedure(name)?;
            record_list(pkb, body, &[])?;
        }

        let mut direct_calls: HashMap<String, HashSet<String>> = HashMap::new();
        for (name, body) in &procedures {
            let mut callees = HashSet::new();
            for node in body {
                collect_callees(node, &mut callees);
            }
            for callee in &callees {
                if !names.contains(callee.as_str()) {
                    return Err(BuildError::UnknownProcedure(callee.clone()));
                }
                pkb.add_call(name, callee)?;
            }
            direct_calls.insert(name.clone(), callees);
        }

        let mut descendants: HashMap<String, HashSet<String>> = HashMap::new();
        for (name, _) in &procedures {
            descendants.insert(name.clone(), reachable(name, &direct_calls));
        }
        let mut ancestors: HashMap<String, HashSet<String>> = HashMap::new();
        for (caller, callees) in &descendants {
            for callee in callees {
                ancestors
                    .entry(callee.clone())
                    .or_default()
                    .insert(caller.clone());
            }
        }
        for (name, _) in &procedures {
            if let Some(desc) = descendants.get(name).filter(|d| !d.is_empty()) {
                pkb.set_call_descendants(name, desc.clone())?;
            }
            if let Some(anc) = ancestors.remove(name) {
                pkb.set_call_ancestors(name, anc)?;
            }
        }

        let mut direct: HashMap<String, (HashSet<String>, HashSet<String>)> = HashMap::new();
        for (name, body) in &procedures {
            let entry = direct.entry(name.clone()).or_default();
            for node in body {
                collect_direct_facts(node, &mut entry.0, &mut entry.1);
            }
        }
        let mut summaries: HashMap<String, (HashSet<String>, HashSet<String>)> = HashMap::new();
        for (name, _) in &procedures {
            let mut summary = direct.get(name).cloned().unwrap_or_default();
            for callee in descendants.get(name).into_iter().flatten() {
                if let Some((uses, modifies)) = direct.get(callee) {
                    summary.0.extend(uses.iter().cloned());
                    summary.1.extend(modifies.iter().cloned());
                }
            }
            for variable in &summary.0 {
                pkb.add_uses_proc(name, variable)?;
            }
            for variable in &summary.1 {
                pkb.add_modifies_proc(name, variable)?;
            }
            summaries.insert(name.clone(), summary);
        }

        for (_, body) in &procedures {
            for node in body {
                record_facts(pkb, node, &summaries)?;
            }
        }
        Ok(())
    }
}

fn number_list(list: &[Stmt], next: &mut StmtNo) -> Result<Vec<Node>, BuildError> {
    list.iter().map(|stmt| number_stmt(stmt, next)).collect()
}

fn number_stmt(stmt: &Stmt, next: &mut StmtNo) -> Result<Node, BuildError> {
    let number = *next;
    *next += 1;

    let mut node = Node {
        stmt: number,
        kind: StatementKind::Print,
        uses: Vec::new(),
        modifies: Vec::new(),
        constants: Vec::new(),
        callee: None,
        pattern: None,
        lists: Vec::new(),
    };

    match stmt {
        Stmt::Read(variable) => {
            node.kind = StatementKind::Read;
            node.modifies.push(variable.clone());
        }
        Stmt::Print(variable) => {
            node.uses.push(variable.clone());
        }
        Stmt::Assign { variable, expr } => {
            let expr = NormalizedExpr::parse(expr)?;
            node.kind = StatementKind::Assign;
            node.modifies.push(variable.clone());
            node.uses = expr.variables().into_iter().map(String::from).collect();
            node.constants = expr.constants().into_iter().map(String::from).collect();
            node.pattern = Some((variable.clone(), expr));
        }
        Stmt::Call(procedure) => {
            node.kind = StatementKind::Call;
            node.callee = Some(procedure.clone());
        }
        Stmt::While { condition, body } => {
            node.kind = StatementKind::While;
            node.uses = condition.clone();
            node.lists.push(number_list(body, next)?);
        }
        Stmt::If {
            condition,
            then_branch,
            else_branch,
        } => {
            node.kind = StatementKind::If;
            node.uses = condition.clone();
            node.lists.push(number_list(then_branch, next)?);
            node.lists.push(number_list(else_branch, next)?);
        }
    }
    Ok(node)
}

fn record_list(pkb: &mut Pkb, list: &[Node], ancestors: &[StmtNo]) -> Result<(), BuildError> {
    for (i, node) in list.iter().enumerate() {
        pkb.add_statement(node.stmt, node.kind)?;
        for variable in node.uses.iter().chain(&node.modifies) {
            pkb.add_variable(variable)?;
        }
        for constant in &node.constants {
            pkb.add_constant(constant)?;
        }
        if let Some((variable, expr)) = &node.pattern {
            pkb.add_assign_pattern(node.stmt, variable, expr.clone())?;
        }
        if let Some(callee) = &node.callee {
            pkb.add_call_site(node.stmt, callee)?;
        }

        if let Some(next) = list.get(i + 1) {
            pkb.add_follow(node.stmt, next.stmt)?;
        }
        let following: HashSet<_> = list[i + 1..].iter().map(|n| n.stmt).collect();
        if !following.is_empty() {
            pkb.set_all_following(node.stmt, following)?;
        }
        let followed: HashSet<_> = list[..i].iter().map(|n| n.stmt).collect();
        if !followed.is_empty() {
            pkb.set_all_followed_by(node.stmt, followed)?;
        }

        if let Some(&container) = ancestors.last() {
            pkb.add_parent(container, node.stmt)?;
            pkb.set_ancestors(node.stmt, ancestors.iter().copied().collect())?;
        }
        let mut descendants = HashSet::new();
        node.collect_stmts(&mut descendants);
        if !descendants.is_empty() {
            pkb.set_descendants(node.stmt, descendants)?;
        }

        let mut inner = ancestors.to_vec();
        inner.push(node.stmt);
        for nested in &node.lists {
            record_list(pkb, nested, &inner)?;
        }
    }
    Ok(())
}

fn collect_callees(node: &Node, out: &mut HashSet<String>) {
    if let Some(callee) = &node.callee {
        out.insert(callee.clone());
    }
    for child in node.nested() {
        collect_callees(child, out);
    }
}

fn collect_direct_facts(node: &Node, uses: &mut HashSet<String>, modifies: &mut HashSet<String>) {
    uses.extend(node.uses.iter().cloned());
    modifies.extend(node.modifies.iter().cloned());
    for child in node.nested() {
        collect_direct_facts(child, uses, modifies);
    }
}

fn reachable(from: &str, calls: &HashMap<String, HashSet<String>>) -> HashSet<String> {
    let mut seen = HashSet::new();
    let mut worklist: Vec<&String> = calls.get(from).into_iter().flatten().collect();
    while let Some(proc) = worklist.pop() {
        if seen.insert(proc.clone()) {
            worklist.extend(calls.get(proc).into_iter().flatten());
        }
    }
    seen
}

fn record_facts(
    pkb: &mut Pkb,
    node: &Node,
    summaries: &HashMap<String, (HashSet<String>, HashSet<String>)>,
) -> Result<(HashSet<String>, HashSet<String>), BuildError> {
    let mut uses: HashSet<String> = node.uses.iter().cloned().collect();
    let mut modifies: HashSet<String> = node.modifies.iter().cloned().collect();

    if let Some((callee_uses, callee_modifies)) =
        node.callee.as_ref().and_then(|callee| summaries.get(callee))
    {
        uses.extend(callee_uses.iter().cloned());
        modifies.extend(callee_modifies.iter().cloned());
    }
    for child in node.nested() {
        let (child_uses, child_modifies) = record_facts(pkb, child, summaries)?;
        uses.extend(child_uses);
        modifies.extend(child_modifies);
    }

    for variable in &uses {
        pkb.add_uses_stmt(node.stmt, variable)?;
    }
    for variable in &modifies {
        pkb.add_modifies_stmt(node.stmt, variable)?;
    }
    Ok((uses, modifies))
}
