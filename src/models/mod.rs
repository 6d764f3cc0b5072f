pub mod condominio;
pub mod usuario;

// Re-export core models for easy access
pub use condominio::{
    Condominio, CondominioDraft, CondominioUpdate, NewCondominio, CONDOMINIO_TABLE,
};
pub use usuario::{NewUsuario, TipoAcesso, Usuario, UsuarioDraft, UsuarioUpdate, USUARIOS_TABLE};
