#[cfg(test)]
mod tests {
    use reql_core::{Datum, Frame, Term, TermType};
    use std::collections::BTreeMap;

    #[test]
    fn datum_numbers() {
        assert_eq!(Datum::from(3 as u8), Datum::Number(3.0));
        assert_eq!(Datum::from(-2 as i64), Datum::Number(-2.0));
        assert_eq!(Datum::from(0.5 as f32), Datum::Number(0.5));
        assert_eq!(Datum::from(42).as_i64(), Some(42));
        assert_eq!(Datum::from(4.2).as_i64(), None);
        assert_eq!(Datum::from(4.2).as_f64(), Some(4.2));
        assert_eq!(Datum::Number(f64::INFINITY).as_i64(), None);
        assert_eq!(Datum::from("4").as_f64(), None);
    }

    #[test]
    fn datum_scalars() {
        assert!(Datum::default().is_null());
        assert!(Datum::from(None::<i32>).is_null());
        assert_eq!(Datum::from(Some(true)).as_bool(), Some(true));
        assert_eq!(Datum::from("users").as_str(), Some("users"));
        assert_eq!(Datum::from(String::from("a")), Datum::String("a".into()));
        assert_ne!(Datum::from(1), Datum::from("1"));
    }

    #[test]
    fn datum_collections() {
        let array = Datum::from(vec![1, 2, 3]);
        assert_eq!(array.as_array().map(<[Datum]>::len), Some(3));
        let object: Datum = [("name", Datum::from("ada")), ("age", Datum::from(36))]
            .into_iter()
            .collect();
        assert_eq!(object.get("age"), Some(&Datum::Number(36.0)));
        assert_eq!(object.get("missing"), None);
        assert_eq!(array.get("name"), None);
        assert_eq!(object.as_object().map(BTreeMap::len), Some(2));
    }

    #[test]
    fn datum_display() {
        assert_eq!(Datum::Null.to_string(), "null");
        assert_eq!(Datum::from(1.5).to_string(), "1.5");
        assert_eq!(Datum::from(vec![1, 2]).to_string(), "[1, 2]");
        let object: Datum = [("b", 2), ("a", 1)].into_iter().collect();
        assert_eq!(object.to_string(), "{a: 1, b: 2}");
        assert_eq!(
            Datum::Binary(vec![0u8; 4].into_boxed_slice()).to_string(),
            "<binary, 4 bytes>"
        );
    }

    #[test]
    fn term_from_datum() {
        assert_eq!(
            Term::from(Datum::from(vec![1, 2])),
            Term::Array(vec![Term::from(1), Term::from(2)])
        );
        let object: Datum = [("a", 1)].into_iter().collect();
        assert_eq!(
            Term::from(object),
            Term::Object(BTreeMap::from([("a".to_string(), Term::from(1))]))
        );
        assert_eq!(Term::from(true).term_type(), TermType::DATUM);
        assert_eq!(Term::from(vec![Term::from(1)]).term_type(), TermType::MAKE_ARRAY);
    }

    #[test]
    fn term_call() {
        let term = Term::call(TermType::TABLE, ["users".into()]).optarg("read_mode", "outdated");
        assert_eq!(term.term_type(), TermType::TABLE);
        assert_eq!(term.args(), &[Term::from("users")]);
        let Term::Call { optargs, .. } = &term else {
            panic!("Expected a call");
        };
        assert_eq!(optargs.get("read_mode"), Some(&Term::from("outdated")));
        assert_eq!(Term::from(1).optarg("ignored", 2), Term::from(1));
    }

    #[test]
    fn term_implicit_var() {
        let row = Term::call(TermType::IMPLICIT_VAR, []);
        let filter = Term::call(
            TermType::FILTER,
            [
                Term::call(TermType::TABLE, ["users".into()]),
                Term::call(TermType::GT, [row, 18.into()]),
            ],
        );
        assert!(filter.has_implicit_var());
        assert!(!Term::call(TermType::TABLE, ["users".into()]).has_implicit_var());
    }

    #[test]
    fn term_type_names() {
        assert_eq!(TermType::GET_FIELD.name(), Some("getField"));
        assert_eq!(TermType::FUNCALL.name(), Some("do"));
        assert_eq!(TermType::MAKE_ARRAY.name(), Some("expr"));
        assert_eq!(TermType(9999).name(), None);
        assert_eq!(TermType(9999).to_string(), "<term 9999>");
        assert!(TermType::MONDAY.is_constant());
        assert!(TermType::MONDAY.is_prefix());
        assert!(TermType::DB.is_prefix());
        assert!(!TermType::ADD.is_prefix());
        assert!(!TermType::DB.is_constant());
    }

    #[test]
    fn frames() {
        let path: Vec<Frame> = vec![Frame::from(0usize), "default".into(), Frame::from(2usize)];
        assert_eq!(
            path,
            [
                Frame::Pos(0),
                Frame::Opt("default".into()),
                Frame::Pos(2)
            ]
        );
    }
}
