use uuid::Uuid;

/// A record that belongs to a department and remembers who last wrote it.
pub trait DepartmentScoped {
    fn creator_id(&self) -> Option<Uuid>;
    fn department_id(&self) -> Option<Uuid>;
    fn set_creator(&mut self, actor_id: Uuid);
}

/// A record whose fields freeze for non-superusers once it reaches a final state.
pub trait Lockable {
    fn is_locked(&self) -> bool;
    fn lock_reason(&self) -> &'static str;
}

/// Row visibility for list queries, pushed down into the store's WHERE clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScope {
    Unrestricted,
    /// Only rows whose department is one of these.
    Departments(Vec<Uuid>),
}

impl ListScope {
    pub fn permits(&self, department_id: Uuid) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Departments(departments) => departments.contains(&department_id),
        }
    }
}
