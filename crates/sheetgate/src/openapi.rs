//! OpenAPI description of the routes, consumed by the GPT action config.
use serde_json::{Map, Value, json};

#[derive(Debug)]
pub struct Endpoints {
    pub home: &'static str,
    pub preview: &'static str,
    pub list_sheets: &'static str,
    pub get_lines: &'static str,
    pub add_entry: &'static str,
    pub update_entry: &'static str,
    pub update_cell: &'static str,
    pub openapi: &'static str,
}

pub const ENDPOINTS: Endpoints = Endpoints {
    home: "/",
    preview: "/preview",
    list_sheets: "/list-sheets",
    get_lines: "/get-lines",
    add_entry: "/add-entry",
    update_entry: "/update-entry",
    update_cell: "/update-cell",
    openapi: "/openapi.json",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Post => "post",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
}

/// A query parameter or body field.
#[derive(Debug)]
pub struct Field {
    pub name: &'static str,
    pub ty: FieldType,
    pub required: bool,
    pub description: &'static str,
}

const fn field(
    name: &'static str,
    ty: FieldType,
    required: bool,
    description: &'static str,
) -> Field {
    Field {
        name,
        ty,
        required,
        description,
    }
}

const FEUILLE: Field = field(
    "feuille",
    FieldType::String,
    false,
    "Nom de la feuille. Feuille principale si absent.",
);

/// Shape of a response body, by property name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    Message,
    Preview,
    SheetList,
    Lines,
    Status,
    Document,
}

#[derive(Debug)]
pub struct Route {
    pub method: Method,
    pub path: &'static str,
    pub operation_id: &'static str,
    pub summary: &'static str,
    pub query: &'static [Field],
    pub body: &'static [Field],
    pub response: ResponseShape,
}

/// Every route served. The router and the document are both built from
/// these paths.
pub const ROUTES: &[Route] = &[
    Route {
        method: Method::Get,
        path: ENDPOINTS.home,
        operation_id: "home",
        summary: "Vérifie que l'API répond.",
        query: &[],
        body: &[],
        response: ResponseShape::Message,
    },
    Route {
        method: Method::Get,
        path: ENDPOINTS.preview,
        operation_id: "preview",
        summary: "Retourne les 5 premières lignes de la feuille.",
        query: &[FEUILLE],
        body: &[],
        response: ResponseShape::Preview,
    },
    Route {
        method: Method::Get,
        path: ENDPOINTS.list_sheets,
        operation_id: "listSheets",
        summary: "Liste les feuilles du classeur.",
        query: &[],
        body: &[],
        response: ResponseShape::SheetList,
    },
    Route {
        method: Method::Get,
        path: ENDPOINTS.get_lines,
        operation_id: "getLines",
        summary: "Retourne une plage de lignes de données.",
        query: &[
            FEUILLE,
            field(
                "start",
                FieldType::Integer,
                false,
                "Première ligne de données (à partir de 1).",
            ),
            field(
                "end",
                FieldType::Integer,
                false,
                "Dernière ligne de données, incluse.",
            ),
        ],
        body: &[],
        response: ResponseShape::Lines,
    },
    Route {
        method: Method::Post,
        path: ENDPOINTS.add_entry,
        operation_id: "addEntry",
        summary: "Ajoute une valeur en première colonne si elle n'existe pas déjà.",
        query: &[],
        body: &[
            field("valeur", FieldType::String, true, "Valeur à ajouter."),
            FEUILLE,
        ],
        response: ResponseShape::Status,
    },
    Route {
        method: Method::Post,
        path: ENDPOINTS.update_entry,
        operation_id: "updateEntry",
        summary: "Remplace une valeur de la première colonne.",
        query: &[],
        body: &[
            field(
                "ancienne_valeur",
                FieldType::String,
                true,
                "Valeur existante.",
            ),
            field(
                "nouvelle_valeur",
                FieldType::String,
                true,
                "Nouvelle valeur.",
            ),
            FEUILLE,
        ],
        response: ResponseShape::Status,
    },
    Route {
        method: Method::Post,
        path: ENDPOINTS.update_cell,
        operation_id: "updateCell",
        summary: "Met à jour la cellule d'une colonne pour la ligne correspondant à un nom.",
        query: &[],
        body: &[
            field(
                "nom",
                FieldType::String,
                true,
                "Valeur recherchée dans la colonne de référence.",
            ),
            field(
                "colonne",
                FieldType::String,
                true,
                "En-tête de la colonne à modifier.",
            ),
            field("valeur", FieldType::String, true, "Nouvelle valeur."),
            FEUILLE,
            field(
                "colonne_reference",
                FieldType::String,
                false,
                "En-tête de la colonne de recherche. Première colonne si absent.",
            ),
        ],
        response: ResponseShape::Status,
    },
    Route {
        method: Method::Get,
        path: ENDPOINTS.openapi,
        operation_id: "openapi",
        summary: "Description OpenAPI de ce service.",
        query: &[],
        body: &[],
        response: ResponseShape::Document,
    },
];

fn type_schema(ty: FieldType) -> Value {
    match ty {
        FieldType::String => json!({"type": "string"}),
        FieldType::Integer => json!({"type": "integer", "minimum": 1}),
    }
}

fn records_schema() -> Value {
    json!({"type": "array", "items": {"type": "object", "additionalProperties": true}})
}

fn response_schema(shape: ResponseShape) -> Value {
    let string = json!({"type": "string"});
    match shape {
        ResponseShape::Message => json!({
            "type": "object",
            "properties": {"message": string},
        }),
        ResponseShape::Preview => json!({
            "type": "object",
            "properties": {"extrait": records_schema(), "error": string},
        }),
        ResponseShape::SheetList => json!({
            "type": "object",
            "properties": {
                "feuilles_accessibles": {"type": "array", "items": string},
                "error": string,
            },
        }),
        ResponseShape::Lines => json!({
            "type": "object",
            "properties": {"plage": string, "données": records_schema(), "error": string},
        }),
        ResponseShape::Status => json!({
            "type": "object",
            "properties": {
                "status": {"type": "string", "enum": ["success", "error"]},
                "message": string,
            },
            "required": ["status", "message"],
        }),
        ResponseShape::Document => json!({"type": "object"}),
    }
}

fn operation(route: &Route) -> Value {
    let mut op = Map::new();
    op.insert("operationId".to_string(), json!(route.operation_id));
    op.insert("summary".to_string(), json!(route.summary));

    if !route.query.is_empty() {
        let params: Vec<Value> = route
            .query
            .iter()
            .map(|f| {
                json!({
                    "name": f.name,
                    "in": "query",
                    "required": f.required,
                    "description": f.description,
                    "schema": type_schema(f.ty),
                })
            })
            .collect();
        op.insert("parameters".to_string(), Value::Array(params));
    }

    if !route.body.is_empty() {
        let mut properties = Map::new();
        for f in route.body {
            let mut schema = type_schema(f.ty);
            schema["description"] = json!(f.description);
            properties.insert(f.name.to_string(), schema);
        }
        let required: Vec<&str> = route
            .body
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect();
        op.insert(
            "requestBody".to_string(),
            json!({
                "required": true,
                "content": {"application/json": {"schema": {
                    "type": "object",
                    "properties": properties,
                    "required": required,
                }}},
            }),
        );
    }

    op.insert(
        "responses".to_string(),
        json!({"200": {
            "description": "Réponse",
            "content": {"application/json": {"schema": response_schema(route.response)}},
        }}),
    );

    Value::Object(op)
}

/// Build the OpenAPI 3.1 document for [`ROUTES`].
pub fn document(public_url: Option<&str>) -> Value {
    let mut paths = Map::new();
    for route in ROUTES {
        let entry = paths
            .entry(route.path.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        entry[route.method.as_str()] = operation(route);
    }

    let mut doc = json!({
        "openapi": "3.1.0",
        "info": {
            "title": "SheetGate",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Lecture et mise à jour d'un classeur Google Sheets.",
        },
        "paths": paths,
    });
    if let Some(url) = public_url {
        doc["servers"] = json!([{"url": url.trim_end_matches('/')}]);
    }
    doc
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn every_route_documented() {
        let doc = document(None);
        for route in ROUTES {
            let op = &doc["paths"][route.path][route.method.as_str()];
            assert_eq!(json!(route.operation_id), op["operationId"], "{}", route.path);
        }
    }

    #[test]
    fn operation_ids_unique() {
        let ids: HashSet<_> = ROUTES.iter().map(|r| r.operation_id).collect();
        assert_eq!(ROUTES.len(), ids.len());
    }

    #[test]
    fn update_cell_body() {
        let doc = document(None);
        let schema = &doc["paths"]["/update-cell"]["post"]["requestBody"]["content"]
            ["application/json"]["schema"];
        assert_eq!(json!(["nom", "colonne", "valeur"]), schema["required"]);
        assert!(schema["properties"]["colonne_reference"].is_object());
    }

    #[test]
    fn query_parameters() {
        let doc = document(None);
        let params = doc["paths"]["/get-lines"]["get"]["parameters"]
            .as_array()
            .unwrap();
        let names: Vec<_> = params.iter().map(|p| p["name"].as_str().unwrap()).collect();
        assert_eq!(vec!["feuille", "start", "end"], names);
    }

    #[test]
    fn servers() {
        assert!(document(None).get("servers").is_none());
        let doc = document(Some("https://sheets.example.com/"));
        assert_eq!(json!("https://sheets.example.com"), doc["servers"][0]["url"]);
    }
}
