#[cfg(test)]
mod tests {
    use std::io::Write;

    use anyhow::Result;

    use crate::bind::{BindErrorKind, Binder};
    use crate::exec::MethodCall;
    use crate::registry::{MethodSpec, Registry};
    use crate::val::{Group, Matrix, Value};

    fn noop(_call: &mut MethodCall<'_>) -> Result<()> {
        Ok(())
    }

    fn registry() -> Result<Registry> {
        let mut b = Registry::builder();
        b.variable("n", Group::Index, "")?;
        b.variable("x", Group::Numeric, "")?;
        b.variable("v", Group::Vector, "")?;
        b.variable("f_grid", Group::Vector, "")?;
        b.method(MethodSpec::new("IndexSet", noop).gout(Group::Index).keyword("value", Group::Index))?;
        b.method(MethodSpec::new("NumericSet", noop).gout(Group::Numeric).keyword("value", Group::Numeric))?;
        b.method(MethodSpec::new("VectorSet", noop).gout(Group::Vector).keyword("values", Group::Vector))?;
        b.method(
            MethodSpec::new("Grid", noop)
                .output("f_grid")
                .keyword("start", Group::Numeric)
                .keyword("stop", Group::Numeric),
        )?;
        b.method(MethodSpec::new("Copy", noop).gout(Group::Any).gin(Group::Any))?;
        b.method(MethodSpec::new("Run", noop).embeds_pipeline())?;
        b.method(
            MethodSpec::new("Tag", noop)
                .keyword("names", Group::ArrayOfString)
                .keyword("m", Group::Matrix),
        )?;
        b.method(MethodSpec::new("Keep", noop).keyword("v", Group::Any))?;
        b.build()
    }

    #[test]
    fn test_positional_single_keyword() -> Result<()> {
        let reg = registry()?;
        let p = Binder::new(&reg).bind_str("main", "IndexSet(n) { 3 }")?;
        assert_eq!(p.name(), "main");
        assert_eq!(p.len(), 1);
        let t = &p.tasks()[0];
        assert_eq!(t.method(), reg.method_id("IndexSet").unwrap());
        assert_eq!(t.generic_outputs(), &[reg.variable_id("n").unwrap()]);
        assert_eq!(t.keywords(), &[Value::Index(3)]);
        assert!(t.embedded().is_none());
        Ok(())
    }

    #[test]
    fn test_named_keywords_and_widening() -> Result<()> {
        let reg = registry()?;
        let binder = Binder::new(&reg);
        let p = binder.bind_str("main", "Grid { start = 1 stop = 2.5 }\nVectorSet(v) { values = [1, 2.5, -3] }")?;
        assert_eq!(p.tasks()[0].keywords(), &[Value::Numeric(1.0), Value::Numeric(2.5)]);
        assert_eq!(p.tasks()[1].keywords(), &[Value::Vector(vec![1.0, 2.5, -3.0])]);
        Ok(())
    }

    #[test]
    fn test_generic_inputs_follow_outputs() -> Result<()> {
        let reg = registry()?;
        let p = Binder::new(&reg).bind_str("main", "Copy(v, f_grid) {}")?;
        let t = &p.tasks()[0];
        assert_eq!(t.generic_outputs(), &[reg.variable_id("v").unwrap()]);
        assert_eq!(t.generic_inputs(), &[reg.variable_id("f_grid").unwrap()]);
        Ok(())
    }

    #[test]
    fn test_nested_pipelines() -> Result<()> {
        let reg = registry()?;
        let src = r#"
            # outer
            Run {
                IndexSet(n) { 1 }
                Run {
                    NumericSet(x) { value = 2 }
                }
            }
        "#;
        let p = Binder::new(&reg).bind_str("main", src)?;
        assert_eq!(p.len(), 1);
        let outer = p.tasks()[0].embedded().unwrap();
        assert_eq!(outer.name(), "Run");
        assert_eq!(outer.len(), 2);
        let inner = outer.tasks()[1].embedded().unwrap();
        assert_eq!(inner.tasks()[0].keywords(), &[Value::Numeric(2.0)]);
        Ok(())
    }

    #[test]
    fn test_empty_embedded_pipeline() -> Result<()> {
        let reg = registry()?;
        let p = Binder::new(&reg).bind_str("main", "Run {}")?;
        assert!(p.tasks()[0].embedded().unwrap().is_empty());
        Ok(())
    }

    #[test]
    fn test_string_and_matrix_literals() -> Result<()> {
        let reg = registry()?;
        let p = Binder::new(&reg).bind_str("main", r#"Tag { names = ["a", "b"] m = [[1, 2], [3, 4.5]] }"#)?;
        let kws = p.tasks()[0].keywords();
        assert_eq!(kws[0], Value::ArrayOfString(vec!["a".to_string(), "b".to_string()]));
        let m = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.5]])?;
        assert_eq!(kws[1], Value::Matrix(m));
        Ok(())
    }

    #[test]
    fn test_any_keyword_infers_group() -> Result<()> {
        let reg = registry()?;
        let binder = Binder::new(&reg);
        let cases = [
            ("Keep { 4 }", Group::Index),
            ("Keep { 4.0 }", Group::Numeric),
            ("Keep { \"s\" }", Group::String),
            ("Keep { [1, 2] }", Group::ArrayOfIndex),
            ("Keep { [1, 2.0] }", Group::Vector),
            ("Keep { [] }", Group::Vector),
            ("Keep { [\"a\"] }", Group::ArrayOfString),
            ("Keep { [[1], [2]] }", Group::Matrix),
        ];
        for (src, group) in cases {
            let p = binder.bind_str("main", src)?;
            assert_eq!(p.tasks()[0].keywords()[0].group(), group, "{}", src);
        }
        Ok(())
    }

    #[test]
    fn test_error_kinds() -> Result<()> {
        let reg = registry()?;
        let binder = Binder::new(&reg);
        let cases = [
            ("Nope {}", BindErrorKind::UnknownMethod),
            ("IndexSet(missing) { 1 }", BindErrorKind::UnknownVariable),
            ("IndexSet(v) { 1 }", BindErrorKind::WrongGroup),
            ("IndexSet(n) { 2.5 }", BindErrorKind::WrongGroup),
            ("Tag { names = [\"a\"] m = [[1, 2], [3]] }", BindErrorKind::WrongGroup),
            ("IndexSet { 1 }", BindErrorKind::WrongArity),
            ("IndexSet(n, n) { 1 }", BindErrorKind::WrongArity),
            ("Grid { start = 1 }", BindErrorKind::WrongArity),
            ("Grid { start = 1 foo = 2 }", BindErrorKind::UnexpectedKeyword),
            ("Grid { stop = 1 start = 2 }", BindErrorKind::UnexpectedKeyword),
            ("Copy(v, v) { k = 1 }", BindErrorKind::UnexpectedKeyword),
            ("IndexSet(n) { 1 IndexSet(n) { 2 } }", BindErrorKind::Syntax),
            ("Grid { 1 2 }", BindErrorKind::Syntax),
            ("Run { IndexSet(n) { 1 }", BindErrorKind::UnexpectedEnd),
            ("IndexSet(n", BindErrorKind::UnexpectedEnd),
            ("IndexSet(n) { ; }", BindErrorKind::Syntax),
        ];
        for (src, kind) in cases {
            let err = binder.bind_str("main", src).unwrap_err();
            assert_eq!(err.kind, kind, "{}: {}", src, err);
        }
        Ok(())
    }

    #[test]
    fn test_error_position() -> Result<()> {
        let reg = registry()?;
        let err = Binder::new(&reg)
            .bind_str("main", "IndexSet(n) { 1 }\n  Missing {}")
            .unwrap_err();
        assert_eq!(err.kind, BindErrorKind::UnknownMethod);
        let at = err.position.unwrap();
        assert_eq!((at.line, at.column), (2, 3));
        assert_eq!(err.to_string(), "Unknown method 'Missing' at 2:3");
        Ok(())
    }

    #[test]
    fn test_display_rebinds_to_same_pipeline() -> Result<()> {
        let reg = registry()?;
        let binder = Binder::new(&reg);
        let src = r#"
            IndexSet(n) { 2 }
            Grid { start = 1 stop = 10 }
            Run {
                VectorSet(v) { [0.5, 1, 1e20] }
                Copy(v, f_grid) {}
                Run {}
            }
            Tag { names = ["x"] m = [[1, 2]] }
        "#;
        let first = binder.bind_str("main", src)?;
        let printed = first.display(&reg).to_string();
        let second = binder.bind_str("main", &printed)?;
        assert_eq!(first, second, "printed form:\n{}", printed);
        assert!(printed.contains("Grid {\n  start = 1.0\n  stop = 10.0\n}"));
        Ok(())
    }

    #[test]
    fn test_bind_files_concatenates_in_order() -> Result<()> {
        let reg = registry()?;
        let dir = tempfile::tempdir()?;
        let a = dir.path().join("a.arts");
        let b = dir.path().join("b.arts");
        writeln!(std::fs::File::create(&a)?, "IndexSet(n) {{ 1 }}")?;
        writeln!(std::fs::File::create(&b)?, "NumericSet(x) {{ 2 }}\nIndexSet(n) {{ 3 }}")?;

        let p = Binder::new(&reg).bind_files(&[&a, &b])?;
        assert_eq!(p.name(), "main");
        assert_eq!(p.len(), 3);
        assert_eq!(p.tasks()[2].keywords(), &[Value::Index(3)]);
        Ok(())
    }

    #[test]
    fn test_file_errors_carry_file_name() -> Result<()> {
        let reg = registry()?;
        let dir = tempfile::tempdir()?;
        let bad = dir.path().join("bad.arts");
        std::fs::write(&bad, "Unknown {}")?;
        let err = Binder::new(&reg).bind_file(&bad).unwrap_err();
        assert!(err.to_string().starts_with(&format!("{}:1:1:", bad.display())));

        let err = Binder::new(&reg).bind_file(&dir.path().join("absent.arts")).unwrap_err();
        assert_eq!(err.kind, BindErrorKind::Io);
        Ok(())
    }
}
