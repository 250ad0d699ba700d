mod composite;
mod error;
mod id;
mod payload;
mod pool;
mod tag;

pub use composite::{CompositeBuilder, CompositeSealed, CompositeState, Member, MemberType, MemberValue};
pub use error::{TypeError, TypeResult};
pub use id::{TypeId, TypeName};
pub use payload::{StructureKey, TypePayload};
pub use pool::TypePool;
pub use tag::{StructureIndexKind, TypeDisposition, TypeMetrics, TypeTag};
