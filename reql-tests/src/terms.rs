use reql::{Datum, Term, TermType};

pub fn db(name: &str) -> Term {
    Term::call(TermType::DB, [name.into()])
}

/// `r.table(name)`
pub fn table(name: &str) -> Term {
    Term::call(TermType::TABLE, [name.into()])
}

/// `receiver(field)`
pub fn field(receiver: Term, name: &str) -> Term {
    Term::call(TermType::GET_FIELD, [receiver, name.into()])
}

pub fn var(id: i64) -> Term {
    Term::call(TermType::VAR, [id.into()])
}

/// `r.row`
pub fn row() -> Term {
    Term::call(TermType::IMPLICIT_VAR, [])
}

/// Function with the parameter ids `params`.
pub fn func(params: &[i64], body: Term) -> Term {
    let params = Datum::from(params.to_vec());
    Term::call(TermType::FUNC, [Term::from(params), body])
}

/// `r.table("users")("age").add(1)`
pub fn users_age_plus_one() -> Term {
    Term::call(TermType::ADD, [field(table("users"), "age"), 1.into()])
}
