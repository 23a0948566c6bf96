#[cfg(test)]
mod tests {
    use anyhow::Result;

    use crate::exec::MethodCall;
    use crate::registry::{MethodSet, MethodSpec, Registry, RegistryBuilder};
    use crate::val::Group;

    fn noop(_call: &mut MethodCall<'_>) -> Result<()> {
        Ok(())
    }

    #[derive(Debug)]
    struct GridSet;

    impl MethodSet for GridSet {
        fn name(&self) -> &str {
            "grid"
        }

        fn register(&self, b: &mut RegistryBuilder) -> Result<()> {
            b.variable("f_grid", Group::Vector, "Frequency grid.")?;
            b.variable("y", Group::Vector, "Measurement vector.")?;
            b.method(MethodSpec::new("FGridSet", noop).output("f_grid").keyword("values", Group::Vector))?;
            b.method(MethodSpec::new("YCalc", noop).output("y").input("f_grid"))?;
            Ok(())
        }
    }

    fn build() -> Result<Registry> {
        let mut b = Registry::builder();
        b.register(&GridSet)?;
        b.build()
    }

    #[test]
    fn test_lookup_by_name_and_id() -> Result<()> {
        let reg = build()?;
        assert_eq!(reg.variable_count(), 2);
        assert_eq!(reg.method_count(), 2);

        let f = reg.variable_id("f_grid").unwrap();
        assert_eq!(reg.variable(f).name, "f_grid");
        assert_eq!(reg.variable(f).group, Group::Vector);

        let m = reg.method_id("YCalc").unwrap();
        let def = reg.method(m);
        assert_eq!(def.fixed_inputs, vec![f]);
        assert_eq!(def.fixed_outputs, vec![reg.variable_id("y").unwrap()]);
        assert!(reg.method_id("Nope").is_none());
        Ok(())
    }

    #[test]
    fn test_producers_and_consumers() -> Result<()> {
        let reg = build()?;
        let f = reg.variable_id("f_grid").unwrap();
        let producers: Vec<_> = reg.methods_producing(f).map(|m| m.name.as_str()).collect();
        let consumers: Vec<_> = reg.methods_consuming(f).map(|m| m.name.as_str()).collect();
        assert_eq!(producers, vec!["FGridSet"]);
        assert_eq!(consumers, vec!["YCalc"]);
        Ok(())
    }

    #[test]
    fn test_duplicates_rejected() {
        let mut b = Registry::builder();
        b.variable("x", Group::Index, "").unwrap();
        assert!(b.variable("x", Group::Numeric, "").is_err());

        b.method(MethodSpec::new("M", noop)).unwrap();
        let err = b.method(MethodSpec::new("M", noop)).unwrap_err();
        assert!(err.to_string().contains("already registered"));
    }

    #[test]
    fn test_any_variable_rejected() {
        let mut b = Registry::builder();
        assert!(b.variable("wild", Group::Any, "").is_err());
    }

    #[test]
    fn test_pipeline_keyword_rejected() {
        let mut b = Registry::builder();
        let err = b
            .method(MethodSpec::new("Bad", noop).keyword("agenda", Group::Pipeline))
            .unwrap_err();
        assert!(err.to_string().contains("cannot be a Pipeline"));
    }

    #[test]
    fn test_unknown_fixed_variable_fails_build() {
        let mut b = Registry::builder();
        b.method(MethodSpec::new("Reader", noop).input("missing")).unwrap();
        let err = b.build().unwrap_err();
        assert!(err.to_string().contains("unknown variable 'missing'"));
    }

    #[test]
    fn test_method_set_error_names_the_set() {
        #[derive(Debug)]
        struct Broken;
        impl MethodSet for Broken {
            fn name(&self) -> &str {
                "broken"
            }
            fn register(&self, b: &mut RegistryBuilder) -> Result<()> {
                b.variable("a", Group::Index, "")?;
                b.variable("a", Group::Index, "")?;
                Ok(())
            }
        }
        let mut b = Registry::builder();
        let err = b.register(&Broken).unwrap_err();
        assert!(err.to_string().contains("'broken'"));
    }

    #[test]
    fn test_describe_method() -> Result<()> {
        let reg = build()?;
        let text = reg.describe_method(reg.method_id("FGridSet").unwrap());
        assert!(text.contains("Method: FGridSet"));
        assert!(text.contains("Output: f_grid"));
        assert!(text.contains("Keyword: values (Vector)"));

        let text = reg.describe_variable(reg.variable_id("y").unwrap());
        assert!(text.contains("Group: Vector"));
        assert!(text.contains("Measurement vector."));
        Ok(())
    }
}
