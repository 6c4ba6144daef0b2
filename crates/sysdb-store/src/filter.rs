//! Filter/matcher expressions (spec.md §4.3 "Filters", GLOSSARY "Filter /
//! Matcher"): field references and constants combined by typed comparisons
//! and boolean connectives, evaluated against one entity at a time.

use sysdb_core::{Datum, Field, Time};

use crate::entity::Fielded;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValueExpr {
    Field(Field),
    Const(Datum),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Cmp(CmpOp, ValueExpr, ValueExpr),
    And(Box<Filter>, Box<Filter>),
    Or(Box<Filter>, Box<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    pub fn eval<E: Fielded>(&self, entity: &E, now: Time) -> bool {
        match self {
            Filter::Cmp(op, lhs, rhs) => {
                let l = resolve(lhs, entity, now);
                let r = resolve(rhs, entity, now);
                apply(*op, &l, &r)
            }
            Filter::And(a, b) => a.eval(entity, now) && b.eval(entity, now),
            Filter::Or(a, b) => a.eval(entity, now) || b.eval(entity, now),
            Filter::Not(a) => !a.eval(entity, now),
        }
    }
}

fn resolve<E: Fielded>(v: &ValueExpr, entity: &E, now: Time) -> Datum {
    match v {
        ValueExpr::Field(f) => entity.field(*f, now),
        ValueExpr::Const(d) => d.clone(),
    }
}

fn apply(op: CmpOp, l: &Datum, r: &Datum) -> bool {
    use std::cmp::Ordering::*;
    let ord = l.cmp(r);
    match op {
        CmpOp::Eq => ord == Equal,
        CmpOp::Ne => ord != Equal,
        CmpOp::Lt => ord == Less,
        CmpOp::Le => ord != Greater,
        CmpOp::Gt => ord == Greater,
        CmpOp::Ge => ord != Less,
    }
}
