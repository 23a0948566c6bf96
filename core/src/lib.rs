pub mod bind;
pub mod exec;
pub mod pipeline;
pub mod registry;
pub mod token;
pub mod val;
pub mod workspace;

pub use bind::{BindError, BindErrorKind, Binder};
pub use exec::{ExecutionError, Executor, Getaway, MethodCall};
pub use pipeline::{Pipeline, TaskRecord};
pub use registry::{MethodDef, MethodId, MethodSet, MethodSpec, Registry, RegistryBuilder, VarId, VariableDef};
pub use val::{Group, Matrix, Value};
pub use workspace::Workspace;
