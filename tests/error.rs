#[cfg(test)]
mod tests {
    use indoc::indoc;
    use reql::{
        Error, ErrorKind, Frame, ReqlError, ResponseType, Term, TermType, error_type,
    };
    use reql_tests::{init_logs, silent_logs, table, users_age_plus_one};

    #[test]
    fn runtime_error_with_caret() {
        init_logs();
        let error = ReqlError::runtime(
            error_type::QUERY_LOGIC,
            "No attribute `age` in object.",
            Some(&users_age_plus_one()),
            Some(vec![Frame::Pos(0), Frame::Pos(1)]),
        );
        assert_eq!(error.kind(), ErrorKind::QueryLogic);
        assert_eq!(error.kind().name(), "ReqlQueryLogicError");
        assert_eq!(
            error.to_string(),
            indoc! {r#"
                No attribute `age` in object in:
                r.table("users")("age").add(1)
                                 ^^^^^
            "#}
        );
        assert_eq!(error.frames(), Some(&[Frame::Pos(0), Frame::Pos(1)][..]));
    }

    #[test]
    fn runtime_kinds() {
        let kinds = [
            (error_type::INTERNAL, ErrorKind::Internal),
            (error_type::RESOURCE_LIMIT, ErrorKind::ResourceLimit),
            (error_type::QUERY_LOGIC, ErrorKind::QueryLogic),
            (error_type::NON_EXISTENCE, ErrorKind::Runtime),
            (error_type::OP_FAILED, ErrorKind::OpFailed),
            (error_type::OP_INDETERMINATE, ErrorKind::OpIndeterminate),
            (error_type::USER, ErrorKind::User),
            (error_type::PERMISSION_ERROR, ErrorKind::Runtime),
        ];
        for (code, kind) in kinds {
            assert_eq!(ErrorKind::from_error_type(code), kind);
            assert!(kind.is_runtime());
        }
        assert!(!ErrorKind::Compile.is_runtime());
        assert!(!ErrorKind::Driver.is_runtime());
        assert_eq!(ErrorKind::User.to_string(), "ReqlUserError");
    }

    #[test]
    fn from_response() {
        let term = users_age_plus_one();
        let error = ReqlError::from_response(
            ResponseType::RuntimeError,
            Some(error_type::USER),
            "boom",
            Some(&term),
            Some(vec![]),
        )
        .expect("Expected an error");
        assert_eq!(error.kind(), ErrorKind::User);
        assert_eq!(
            error.message(),
            indoc! {r#"
                boom in:
                r.table("users")("age").add(1)
                ^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^
            "#}
        );
        let error = ReqlError::from_response(
            ResponseType::CompileError,
            None,
            "Expected 2 arguments but found 1.",
            Some(&term),
            Some(vec![Frame::Pos(0), Frame::Pos(0)]),
        )
        .expect("Expected an error");
        assert_eq!(error.kind(), ErrorKind::Compile);
        assert_eq!(
            error.message(),
            indoc! {r#"
                Expected 2 arguments but found 1 in:
                r.table("users")("age").add(1)
                ^^^^^^^^^^^^^^^^
            "#}
        );
        let error = ReqlError::from_response(
            ResponseType::ClientError,
            None,
            "Unsupported protocol",
            Some(&term),
            None,
        )
        .expect("Expected an error");
        assert_eq!(error.kind(), ErrorKind::Client);
        assert_eq!(error.message(), "Unsupported protocol");
        assert!(
            ReqlError::from_response(ResponseType::SuccessAtom, None, "", Some(&term), None)
                .is_none()
        );
    }

    #[test]
    fn runtime_without_query() {
        let error = ReqlError::runtime(error_type::OP_FAILED, "Cannot perform write.", None, None);
        assert_eq!(error.kind(), ErrorKind::OpFailed);
        assert_eq!(error.message(), "Cannot perform write.");
    }

    #[test]
    fn runtime_without_frames() {
        let error = ReqlError::runtime(
            error_type::INTERNAL,
            "Unexpected state",
            Some(&table("users")),
            None,
        );
        assert_eq!(error.message(), "Unexpected state");
        let error = ReqlError::compile("Expected 2 arguments.", Some(&table("users")), None);
        assert_eq!(error.message(), "Expected 2 arguments.");
        assert_eq!(error.frames(), None);
    }

    #[test]
    fn driver_error() {
        let error = ReqlError::driver("Something went wrong", None);
        assert_eq!(error.kind(), ErrorKind::Driver);
        assert_eq!(error.message(), "Something went wrong.");
        let error = ReqlError::driver("Did you forget to call `run`?", None);
        assert_eq!(error.message(), "Did you forget to call `run`?");
        let error = ReqlError::driver("Nested functions are not allowed.", Some(&table("users")));
        assert_eq!(
            error.message(),
            "Nested functions are not allowed after:\nr.table(\"users\")"
        );
        let error = ReqlError::driver("Anonymous function returned `undefined`", None)
            .with_hint("Did you forget a `return`?");
        assert_eq!(
            error.message(),
            "Anonymous function returned `undefined`.\nDid you forget a `return`?"
        );
    }

    #[test]
    fn server_error() {
        let error = ReqlError::server("Connection is closed.", Some(&users_age_plus_one()));
        assert_eq!(error.kind(), ErrorKind::Server);
        assert_eq!(
            error.message(),
            indoc! {r#"
                Connection is closed for:
                r.table("users")("age").add(1)"#}
        );
    }

    #[test]
    fn malformed_query_keeps_message() {
        init_logs();
        let broken = Term::call(TermType(9999), [table("users")]);
        silent_logs! {
            let error = ReqlError::runtime(
                error_type::QUERY_LOGIC,
                "Bad query.",
                Some(&broken),
                Some(vec![Frame::Pos(0)]),
            );
            assert_eq!(error.message(), "Bad query.");
            let error = ReqlError::server("Bad query", Some(&broken));
            assert_eq!(error.message(), "Bad query.");
        }
    }

    #[test]
    fn transport_errors() {
        let original = ReqlError::runtime(error_type::USER, "boom", None, None);
        let error: Error = original.into();
        assert!(error.downcast_ref::<ReqlError>().is_some());
        let error = ReqlError::from_transport(error);
        assert_eq!(error.kind(), ErrorKind::User);
        assert_eq!(error.message(), "boom");
        let error = ReqlError::from_transport(Error::msg("Connection reset"));
        assert_eq!(error.kind(), ErrorKind::Server);
        assert_eq!(error.message(), "Connection reset.");
    }

    #[test]
    fn response_codes() {
        for response_type in [
            ResponseType::SuccessAtom,
            ResponseType::SuccessSequence,
            ResponseType::SuccessPartial,
            ResponseType::WaitComplete,
            ResponseType::ServerInfo,
            ResponseType::ClientError,
            ResponseType::CompileError,
            ResponseType::RuntimeError,
        ] {
            assert_eq!(ResponseType::from_code(response_type.code()), Some(response_type));
        }
        assert_eq!(ResponseType::RuntimeError.code(), 18);
        assert_eq!(ResponseType::from_code(6), None);
    }
}
