#[cfg(test)]
mod tests {
    use anyhow::Result;

    use crate::exec::{ExecutionError, MethodCall};
    use crate::pipeline::{Pipeline, TaskRecord};
    use crate::registry::{MethodSpec, Registry};
    use crate::val::{Group, Value};

    fn noop(_call: &mut MethodCall<'_>) -> Result<()> {
        Ok(())
    }

    fn registry() -> Result<Registry> {
        let mut b = Registry::builder();
        b.variable("p_grid", Group::Vector, "")?;
        b.variable("y", Group::Vector, "")?;
        b.variable("n", Group::Index, "")?;
        b.method(MethodSpec::new("PGridSet", noop).output("p_grid").keyword("values", Group::Vector))?;
        b.method(MethodSpec::new("YCalc", noop).output("y").input("p_grid"))?;
        b.method(MethodSpec::new("IndexSet", noop).gout(Group::Index).keyword("value", Group::Index))?;
        b.method(MethodSpec::new("Run", noop).embeds_pipeline())?;
        b.build()
    }

    #[test]
    fn test_append_resize_truncate() -> Result<()> {
        let reg = registry()?;
        let ycalc = TaskRecord::simple(reg.method_id("YCalc").unwrap());
        let mut p = Pipeline::new("agenda");
        assert!(p.is_empty());

        p.append(ycalc.clone());
        p.resize(3, ycalc.clone());
        assert_eq!(p.len(), 3);
        p.resize(1, ycalc);
        assert_eq!(p.len(), 1);
        p.truncate(0);
        assert!(p.is_empty());
        Ok(())
    }

    #[test]
    fn test_clone_is_deep() -> Result<()> {
        let reg = registry()?;
        let mut p = Pipeline::new("agenda");
        p.append(TaskRecord::simple(reg.method_id("YCalc").unwrap()));
        let stored = Value::Pipeline(p.clone());

        p.append(TaskRecord::simple(reg.method_id("YCalc").unwrap()));
        p.set_name("renamed");
        let stored = stored.as_pipeline()?;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored.name(), "agenda");
        Ok(())
    }

    #[test]
    fn test_inputs_and_outputs_are_recursive() -> Result<()> {
        let reg = registry()?;
        let p_grid = reg.variable_id("p_grid").unwrap();
        let y = reg.variable_id("y").unwrap();
        let n = reg.variable_id("n").unwrap();

        let inner = Pipeline::with_tasks(
            "Run",
            vec![TaskRecord::new(
                reg.method_id("IndexSet").unwrap(),
                vec![Value::Index(1)],
                vec![n],
                vec![],
                None,
            )],
        );
        let p = Pipeline::with_tasks(
            "main",
            vec![
                TaskRecord::simple(reg.method_id("YCalc").unwrap()),
                TaskRecord::new(reg.method_id("Run").unwrap(), vec![], vec![], vec![], Some(inner)),
            ],
        );
        assert!(p.is_input(&reg, p_grid));
        assert!(!p.is_input(&reg, y));
        assert!(p.is_output(&reg, y));
        assert!(p.is_output(&reg, n));
        assert!(!p.is_output(&reg, p_grid));
        Ok(())
    }

    #[test]
    fn test_check_reports_first_missing_input() -> Result<()> {
        let reg = registry()?;
        let set = TaskRecord::new(
            reg.method_id("PGridSet").unwrap(),
            vec![Value::Vector(vec![1.0])],
            vec![],
            vec![],
            None,
        );
        let ycalc = TaskRecord::simple(reg.method_id("YCalc").unwrap());

        let ok = Pipeline::with_tasks("main", vec![set, ycalc.clone()]);
        ok.check(&reg, &[])?;

        let bad = Pipeline::with_tasks("main", vec![ycalc]);
        match bad.check(&reg, &[]) {
            Err(ExecutionError::MissingInput { method, variable, task }) => {
                assert_eq!((method.as_str(), variable.as_str(), task), ("YCalc", "p_grid", 0));
            }
            other => panic!("unexpected {:?}", other),
        }
        bad.check(&reg, &[reg.variable_id("p_grid").unwrap()])?;
        Ok(())
    }

    #[test]
    fn test_display_indents_embedded() -> Result<()> {
        let reg = registry()?;
        let n = reg.variable_id("n").unwrap();
        let inner = Pipeline::with_tasks(
            "Run",
            vec![TaskRecord::new(
                reg.method_id("IndexSet").unwrap(),
                vec![Value::Index(4)],
                vec![n],
                vec![],
                None,
            )],
        );
        let p = Pipeline::with_tasks(
            "main",
            vec![
                TaskRecord::simple(reg.method_id("YCalc").unwrap()),
                TaskRecord::new(reg.method_id("Run").unwrap(), vec![], vec![], vec![], Some(inner)),
            ],
        );
        let expected = "YCalc {}\nRun {\n  IndexSet(n) {\n    value = 4\n  }\n}\n";
        assert_eq!(p.display(&reg).to_string(), expected);
        Ok(())
    }
}
