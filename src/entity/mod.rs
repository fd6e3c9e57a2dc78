pub mod akun;
pub mod audit_logs;
pub mod farm_products;
pub mod farms;
pub mod invoice;
pub mod orders;
pub mod pengirim;
pub mod pengiriman;
pub mod proses_pengiriman;

pub use akun::Entity as Akun;
pub use audit_logs::Entity as AuditLogs;
pub use farm_products::Entity as FarmProducts;
pub use farms::Entity as Farms;
pub use invoice::Entity as Invoice;
pub use orders::Entity as Orders;
pub use pengirim::Entity as Pengirim;
pub use pengiriman::Entity as Pengiriman;
pub use proses_pengiriman::Entity as ProsesPengiriman;
