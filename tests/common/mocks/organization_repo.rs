use std::sync::Mutex;

use async_trait::async_trait;
use it_assets::domain::{BusinessLine, Department, Supplier};
use it_assets::error::{AppError, AppResult};
use it_assets::infrastructure::repositories::{
    BusinessLineRepository, DepartmentRepository, SupplierRepository,
};
use uuid::Uuid;

#[derive(Default)]
pub struct MockBusinessLineRepo {
    pub lines: Mutex<Vec<BusinessLine>>,
}

impl MockBusinessLineRepo {
    pub fn push(&self, line: BusinessLine) {
        self.lines.lock().expect("lines mutex poisoned").push(line);
    }
}

#[async_trait]
impl BusinessLineRepository for MockBusinessLineRepo {
    async fn list(&self) -> AppResult<Vec<BusinessLine>> {
        Ok(self.lines.lock().expect("lines mutex poisoned").clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BusinessLine>> {
        Ok(self
            .lines
            .lock()
            .expect("lines mutex poisoned")
            .iter()
            .find(|line| line.id == id)
            .cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<BusinessLine>> {
        Ok(self
            .lines
            .lock()
            .expect("lines mutex poisoned")
            .iter()
            .find(|line| line.name == name)
            .cloned())
    }

    async fn create(&self, line: &BusinessLine) -> AppResult<BusinessLine> {
        self.push(line.clone());
        Ok(line.clone())
    }

    async fn update(&self, line: &BusinessLine) -> AppResult<BusinessLine> {
        let mut rows = self.lines.lock().expect("lines mutex poisoned");
        let row = rows
            .iter_mut()
            .find(|row| row.id == line.id)
            .ok_or_else(|| AppError::NotFound("business line not found".to_string()))?;
        *row = line.clone();
        Ok(line.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.lines
            .lock()
            .expect("lines mutex poisoned")
            .retain(|row| row.id != id);
        Ok(())
    }
}

#[derive(Default)]
pub struct MockDepartmentRepo {
    pub departments: Mutex<Vec<Department>>,
}

impl MockDepartmentRepo {
    pub fn push(&self, department: Department) {
        self.departments
            .lock()
            .expect("departments mutex poisoned")
            .push(department);
    }
}

#[async_trait]
impl DepartmentRepository for MockDepartmentRepo {
    async fn list(&self) -> AppResult<Vec<Department>> {
        Ok(self
            .departments
            .lock()
            .expect("departments mutex poisoned")
            .clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Department>> {
        Ok(self
            .departments
            .lock()
            .expect("departments mutex poisoned")
            .iter()
            .find(|department| department.id == id)
            .cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Department>> {
        Ok(self
            .departments
            .lock()
            .expect("departments mutex poisoned")
            .iter()
            .find(|department| department.name == name)
            .cloned())
    }

    async fn create(&self, department: &Department) -> AppResult<Department> {
        self.push(department.clone());
        Ok(department.clone())
    }

    async fn update(&self, department: &Department) -> AppResult<Department> {
        let mut rows = self.departments.lock().expect("departments mutex poisoned");
        let row = rows
            .iter_mut()
            .find(|row| row.id == department.id)
            .ok_or_else(|| AppError::NotFound("department not found".to_string()))?;
        *row = department.clone();
        Ok(department.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.departments
            .lock()
            .expect("departments mutex poisoned")
            .retain(|row| row.id != id);
        Ok(())
    }
}

#[derive(Default)]
pub struct MockSupplierRepo {
    pub suppliers: Mutex<Vec<Supplier>>,
}

impl MockSupplierRepo {
    pub fn push(&self, supplier: Supplier) {
        self.suppliers
            .lock()
            .expect("suppliers mutex poisoned")
            .push(supplier);
    }
}

#[async_trait]
impl SupplierRepository for MockSupplierRepo {
    async fn list(&self, active_only: bool) -> AppResult<Vec<Supplier>> {
        Ok(self
            .suppliers
            .lock()
            .expect("suppliers mutex poisoned")
            .iter()
            .filter(|supplier| !active_only || supplier.is_active)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Supplier>> {
        Ok(self
            .suppliers
            .lock()
            .expect("suppliers mutex poisoned")
            .iter()
            .find(|supplier| supplier.id == id)
            .cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Supplier>> {
        Ok(self
            .suppliers
            .lock()
            .expect("suppliers mutex poisoned")
            .iter()
            .find(|supplier| supplier.name == name)
            .cloned())
    }

    async fn create(&self, supplier: &Supplier) -> AppResult<Supplier> {
        self.push(supplier.clone());
        Ok(supplier.clone())
    }

    async fn update(&self, supplier: &Supplier) -> AppResult<Supplier> {
        let mut rows = self.suppliers.lock().expect("suppliers mutex poisoned");
        let row = rows
            .iter_mut()
            .find(|row| row.id == supplier.id)
            .ok_or_else(|| AppError::NotFound("supplier not found".to_string()))?;
        *row = supplier.clone();
        Ok(supplier.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.suppliers
            .lock()
            .expect("suppliers mutex poisoned")
            .retain(|row| row.id != id);
        Ok(())
    }
}
