pub mod controller;
pub mod debounce;
pub mod filters;
pub mod gate;
pub mod optimistic;
pub mod pagination;

pub use controller::{
    ControllerOptions, FetchOutcome, ItemKey, ListController, ListPhase, ListSource,
    LoadKind, LoadingIndicator, ViewState, WeakController,
};
pub use debounce::Debouncer;
pub use filters::{
    AgentFilters, AiModelFilters, KnowledgeBaseFilters, ListFilters, PopularFilters, TimeWindow,
    ToolFilters,
};
pub use gate::{FetchTicket, RequestGate};
pub use optimistic::{ActiveFlag, ListItem, Optimistic};
pub use pagination::PaginationState;
