use glow::HasContext;

use super::camera::ArcBallCamera;
use super::mesh::{LineMeshData, MeshData};
use crate::build::SceneMeshes;

/// Directional light position; the light shines from here towards the origin
pub(super) const LIGHT_POSITION: [f32; 3] = [1.0, 5.0, 2.0];
const AMBIENT_INTENSITY: f32 = 1.0;
const DIRECTIONAL_INTENSITY: f32 = 0.7;

/// Shadow map resolution in texels per side
const SHADOW_MAP_SIZE: i32 = 1024;
/// Half-extent of the orthographic shadow camera, metres
const SHADOW_EXTENT: f32 = 3.0;
const SHADOW_NEAR: f32 = 1.0;
const SHADOW_FAR: f32 = 7.0;

/// View-projection of the shadow-casting light, looking from
/// `LIGHT_POSITION` at the origin
pub(super) fn light_view_projection() -> glam::Mat4 {
    let view = glam::Mat4::look_at_rh(
        glam::Vec3::from(LIGHT_POSITION),
        glam::Vec3::ZERO,
        glam::Vec3::Y,
    );
    let projection = glam::Mat4::orthographic_rh_gl(
        -SHADOW_EXTENT,
        SHADOW_EXTENT,
        -SHADOW_EXTENT,
        SHADOW_EXTENT,
        SHADOW_NEAR,
        SHADOW_FAR,
    );
    projection * view
}

// ── Render parameters ────────────────────────────────────────

/// Parameters for rendering the viewport
pub struct RenderParams {
    /// Viewport rectangle [x, y, width, height] in pixels
    pub viewport: [f32; 4],
    /// Draw edges through the solid boards
    pub wireframe: bool,
    pub show_ground: bool,
    /// Boards cast shadows onto each other and the ground
    pub shadows: bool,
    /// Background color RGB
    pub bg_color: [u8; 3],
}

// ── GPU mesh handles ─────────────────────────────────────────

struct GpuMesh {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ibo: glow::Buffer,
    index_count: i32,
}

struct GpuLines {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    vertex_count: i32,
}

/// Depth-only render target for the light's view
struct ShadowMap {
    fbo: glow::Framebuffer,
    depth: glow::Texture,
}

// ── Main GL renderer ─────────────────────────────────────────

pub struct GlRenderer {
    mesh_program: glow::Program,
    line_program: glow::Program,
    /// `None` when the depth target could not be created; boards then render unshadowed
    shadow: Option<(glow::Program, ShadowMap)>,
    boards: Vec<GpuMesh>,
    edges: Option<GpuLines>,
    ground: Option<GpuMesh>,
    /// Cache rebuild counter of the uploaded meshes
    last_scene_version: Option<u64>,
}

impl GlRenderer {
    pub fn new(gl: &glow::Context) -> Result<Self, String> {
        let mesh_program = compile_program(gl, MESH_VERT, MESH_FRAG)?;
        let line_program = match compile_program(gl, LINE_VERT, LINE_FRAG) {
            Ok(p) => p,
            Err(e) => {
                unsafe { gl.delete_program(mesh_program) };
                return Err(e);
            }
        };

        let shadow = match create_shadow_pass(gl) {
            Ok(shadow) => Some(shadow),
            Err(e) => {
                tracing::warn!("Shadow map unavailable, rendering without shadows: {e}");
                None
            }
        };

        Ok(Self {
            mesh_program,
            line_program,
            shadow,
            boards: Vec::new(),
            edges: None,
            ground: None,
            last_scene_version: None,
        })
    }

    /// Upload cached scene meshes, replacing the previous upload
    pub fn sync_from_scene(
        &mut self,
        gl: &glow::Context,
        scene: &SceneMeshes,
        version: u64,
    ) -> Result<(), String> {
        if self.last_scene_version == Some(version) {
            return Ok(());
        }

        self.free_scene(gl);

        for data in &scene.boards {
            self.boards.push(upload_mesh(gl, data)?);
        }
        self.edges = Some(upload_lines(gl, &scene.edges)?);
        self.ground = Some(upload_mesh(gl, &scene.ground)?);
        self.last_scene_version = Some(version);
        Ok(())
    }

    fn free_scene(&mut self, gl: &glow::Context) {
        for mesh in self.boards.drain(..) {
            delete_mesh(gl, &mesh);
        }
        if let Some(edges) = self.edges.take() {
            delete_lines(gl, &edges);
        }
        if let Some(ground) = self.ground.take() {
            delete_mesh(gl, &ground);
        }
        self.last_scene_version = None;
    }

    /// Render the scene
    pub fn paint(&self, gl: &glow::Context, camera: &ArcBallCamera, params: &RenderParams) {
        let aspect = params.viewport[2] / params.viewport[3];
        let vp = camera.view_projection(aspect);
        let light_dir = glam::Vec3::from(LIGHT_POSITION).normalize();
        let light_vp = light_view_projection();
        let shadows = params.shadows && self.shadow.is_some();

        unsafe {
            if shadows {
                self.paint_shadow_map(gl, &light_vp);
            }

            gl.viewport(
                params.viewport[0] as i32,
                params.viewport[1] as i32,
                params.viewport[2] as i32,
                params.viewport[3] as i32,
            );
            gl.scissor(
                params.viewport[0] as i32,
                params.viewport[1] as i32,
                params.viewport[2] as i32,
                params.viewport[3] as i32,
            );
            gl.enable(glow::SCISSOR_TEST);

            gl.clear_color(
                params.bg_color[0] as f32 / 255.0,
                params.bg_color[1] as f32 / 255.0,
                params.bg_color[2] as f32 / 255.0,
                1.0,
            );
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

            gl.enable(glow::DEPTH_TEST);
            gl.depth_func(glow::LEQUAL);

            // Lit geometry
            gl.use_program(Some(self.mesh_program));
            set_uniform_mat4(gl, self.mesh_program, "u_mvp", &vp);
            set_uniform_vec3(gl, self.mesh_program, "u_light_dir", &light_dir);
            set_uniform_f32(gl, self.mesh_program, "u_ambient", AMBIENT_INTENSITY);
            set_uniform_f32(gl, self.mesh_program, "u_directional", DIRECTIONAL_INTENSITY);
            set_uniform_mat4(gl, self.mesh_program, "u_light_vp", &light_vp);
            set_uniform_f32(gl, self.mesh_program, "u_shadows", if shadows { 1.0 } else { 0.0 });
            if let (true, Some((_, map))) = (shadows, &self.shadow) {
                gl.active_texture(glow::TEXTURE0);
                gl.bind_texture(glow::TEXTURE_2D, Some(map.depth));
                let loc = gl.get_uniform_location(self.mesh_program, "u_shadow_map");
                gl.uniform_1_i32(loc.as_ref(), 0);
            }

            if params.show_ground {
                if let Some(ref ground) = self.ground {
                    // Push the ground back so boards resting on it win the depth test
                    gl.enable(glow::POLYGON_OFFSET_FILL);
                    gl.polygon_offset(1.0, 1.0);
                    draw_mesh(gl, ground);
                    gl.disable(glow::POLYGON_OFFSET_FILL);
                }
            }

            for mesh in &self.boards {
                draw_mesh(gl, mesh);
            }

            // Board edges; in wireframe they show through the solid boards
            if let Some(ref edges) = self.edges {
                if params.wireframe {
                    gl.disable(glow::DEPTH_TEST);
                }
                gl.use_program(Some(self.line_program));
                set_uniform_mat4(gl, self.line_program, "u_mvp", &vp);
                draw_lines(gl, edges);
                gl.enable(glow::DEPTH_TEST);
            }

            gl.disable(glow::DEPTH_TEST);
            gl.disable(glow::SCISSOR_TEST);
            gl.bind_texture(glow::TEXTURE_2D, None);
            gl.use_program(None);
        }
    }

    /// Render board depth from the light into the shadow map, then restore
    /// the framebuffer the caller was drawing into
    unsafe fn paint_shadow_map(&self, gl: &glow::Context, light_vp: &glam::Mat4) {
        let Some((program, map)) = &self.shadow else {
            return;
        };
        let program = *program;
        let target = gl.get_parameter_framebuffer(glow::FRAMEBUFFER_BINDING);

        gl.bind_framebuffer(glow::FRAMEBUFFER, Some(map.fbo));
        gl.viewport(0, 0, SHADOW_MAP_SIZE, SHADOW_MAP_SIZE);
        gl.disable(glow::SCISSOR_TEST);
        gl.enable(glow::DEPTH_TEST);
        gl.depth_func(glow::LEQUAL);
        gl.clear(glow::DEPTH_BUFFER_BIT);

        // Slope-scaled offset against self-shadowing stripes
        gl.enable(glow::POLYGON_OFFSET_FILL);
        gl.polygon_offset(2.0, 4.0);

        gl.use_program(Some(program));
        set_uniform_mat4(gl, program, "u_light_vp", light_vp);
        for mesh in &self.boards {
            draw_mesh(gl, mesh);
        }

        gl.disable(glow::POLYGON_OFFSET_FILL);
        gl.bind_framebuffer(glow::FRAMEBUFFER, target);
    }

    pub fn destroy(&mut self, gl: &glow::Context) {
        self.free_scene(gl);
        unsafe {
            gl.delete_program(self.mesh_program);
            gl.delete_program(self.line_program);
            if let Some((program, map)) = self.shadow.take() {
                gl.delete_program(program);
                gl.delete_framebuffer(map.fbo);
                gl.delete_texture(map.depth);
            }
        }
    }
}

// ── GPU upload ───────────────────────────────────────────────

fn upload_mesh(gl: &glow::Context, data: &MeshData) -> Result<GpuMesh, String> {
    unsafe {
        let vao = gl.create_vertex_array()?;
        gl.bind_vertex_array(Some(vao));

        let vbo = gl.create_buffer()?;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            cast_slice(&data.vertices),
            glow::STATIC_DRAW,
        );

        let stride = 9 * 4; // 9 floats * 4 bytes
        // position: location 0
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
        // normal: location 1
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(1, 3, glow::FLOAT, false, stride, 3 * 4);
        // color: location 2
        gl.enable_vertex_attrib_array(2);
        gl.vertex_attrib_pointer_f32(2, 3, glow::FLOAT, false, stride, 6 * 4);

        let ibo = gl.create_buffer()?;
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ibo));
        gl.buffer_data_u8_slice(
            glow::ELEMENT_ARRAY_BUFFER,
            cast_slice(&data.indices),
            glow::STATIC_DRAW,
        );

        gl.bind_vertex_array(None);

        Ok(GpuMesh {
            vao,
            vbo,
            ibo,
            index_count: data.indices.len() as i32,
        })
    }
}

fn upload_lines(gl: &glow::Context, data: &LineMeshData) -> Result<GpuLines, String> {
    unsafe {
        let vao = gl.create_vertex_array()?;
        gl.bind_vertex_array(Some(vao));

        let vbo = gl.create_buffer()?;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            cast_slice(&data.vertices),
            glow::STATIC_DRAW,
        );

        let stride = 7 * 4; // 7 floats * 4 bytes
        // position: location 0
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
        // color: location 1
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(1, 4, glow::FLOAT, false, stride, 3 * 4);

        gl.bind_vertex_array(None);

        Ok(GpuLines {
            vao,
            vbo,
            vertex_count: (data.vertices.len() / 7) as i32,
        })
    }
}

fn delete_mesh(gl: &glow::Context, mesh: &GpuMesh) {
    unsafe {
        gl.delete_vertex_array(mesh.vao);
        gl.delete_buffer(mesh.vbo);
        gl.delete_buffer(mesh.ibo);
    }
}

fn delete_lines(gl: &glow::Context, lines: &GpuLines) {
    unsafe {
        gl.delete_vertex_array(lines.vao);
        gl.delete_buffer(lines.vbo);
    }
}

fn create_shadow_pass(gl: &glow::Context) -> Result<(glow::Program, ShadowMap), String> {
    let program = compile_program(gl, SHADOW_VERT, SHADOW_FRAG)?;
    match create_shadow_map(gl) {
        Ok(map) => Ok((program, map)),
        Err(e) => {
            unsafe { gl.delete_program(program) };
            Err(e)
        }
    }
}

fn create_shadow_map(gl: &glow::Context) -> Result<ShadowMap, String> {
    unsafe {
        let depth = gl.create_texture()?;
        gl.bind_texture(glow::TEXTURE_2D, Some(depth));
        gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            glow::DEPTH_COMPONENT24 as i32,
            SHADOW_MAP_SIZE,
            SHADOW_MAP_SIZE,
            0,
            glow::DEPTH_COMPONENT,
            glow::UNSIGNED_INT,
            glow::PixelUnpackData::Slice(None),
        );
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::NEAREST as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::NEAREST as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);
        gl.bind_texture(glow::TEXTURE_2D, None);

        let target = gl.get_parameter_framebuffer(glow::FRAMEBUFFER_BINDING);
        let fbo = match gl.create_framebuffer() {
            Ok(fbo) => fbo,
            Err(e) => {
                gl.delete_texture(depth);
                return Err(e);
            }
        };
        gl.bind_framebuffer(glow::FRAMEBUFFER, Some(fbo));
        gl.framebuffer_texture_2d(
            glow::FRAMEBUFFER,
            glow::DEPTH_ATTACHMENT,
            glow::TEXTURE_2D,
            Some(depth),
            0,
        );
        gl.draw_buffer(glow::NONE);
        gl.read_buffer(glow::NONE);
        let status = gl.check_framebuffer_status(glow::FRAMEBUFFER);
        gl.bind_framebuffer(glow::FRAMEBUFFER, target);

        if status != glow::FRAMEBUFFER_COMPLETE {
            gl.delete_framebuffer(fbo);
            gl.delete_texture(depth);
            return Err(format!("Shadow framebuffer incomplete: 0x{status:x}"));
        }

        Ok(ShadowMap { fbo, depth })
    }
}

// ── Draw calls ───────────────────────────────────────────────

unsafe fn draw_mesh(gl: &glow::Context, mesh: &GpuMesh) {
    gl.bind_vertex_array(Some(mesh.vao));
    gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(mesh.ibo));
    gl.draw_elements(glow::TRIANGLES, mesh.index_count, glow::UNSIGNED_INT, 0);
    gl.bind_vertex_array(None);
}

unsafe fn draw_lines(gl: &glow::Context, lines: &GpuLines) {
    gl.bind_vertex_array(Some(lines.vao));
    gl.draw_arrays(glow::LINES, 0, lines.vertex_count);
    gl.bind_vertex_array(None);
}

// ── Shader compilation ───────────────────────────────────────

fn compile_shader(gl: &glow::Context, kind: u32, src: &str) -> Result<glow::Shader, String> {
    unsafe {
        let shader = gl.create_shader(kind)?;
        gl.shader_source(shader, src);
        gl.compile_shader(shader);
        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            return Err(format!("Shader compile error: {log}"));
        }
        Ok(shader)
    }
}

fn compile_program(gl: &glow::Context, vert_src: &str, frag_src: &str) -> Result<glow::Program, String> {
    unsafe {
        let vert = compile_shader(gl, glow::VERTEX_SHADER, vert_src)?;
        let frag = match compile_shader(gl, glow::FRAGMENT_SHADER, frag_src) {
            Ok(f) => f,
            Err(e) => {
                gl.delete_shader(vert);
                return Err(e);
            }
        };

        let program = gl.create_program()?;
        gl.attach_shader(program, vert);
        gl.attach_shader(program, frag);
        gl.link_program(program);

        gl.delete_shader(vert);
        gl.delete_shader(frag);

        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            gl.delete_program(program);
            return Err(format!("Program link error: {log}"));
        }

        Ok(program)
    }
}

// ── Uniform setters ──────────────────────────────────────────

fn set_uniform_mat4(gl: &glow::Context, program: glow::Program, name: &str, mat: &glam::Mat4) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_matrix_4_f32_slice(loc.as_ref(), false, &mat.to_cols_array());
    }
}

fn set_uniform_vec3(gl: &glow::Context, program: glow::Program, name: &str, v: &glam::Vec3) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_3_f32(loc.as_ref(), v.x, v.y, v.z);
    }
}

fn set_uniform_f32(gl: &glow::Context, program: glow::Program, name: &str, v: f32) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_1_f32(loc.as_ref(), v);
    }
}

// ── Byte cast helper ─────────────────────────────────────────

fn cast_slice<T: Copy>(slice: &[T]) -> &[u8] {
    unsafe { std::slice::from_raw_parts(slice.as_ptr() as *const u8, std::mem::size_of_val(slice)) }
}

// ── Shaders ──────────────────────────────────────────────────

const MESH_VERT: &str = r#"#version 330 core
uniform mat4 u_mvp;
uniform mat4 u_light_vp;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in vec3 a_color;

out vec3 v_normal;
out vec3 v_color;
out vec4 v_light_pos;

void main() {
    gl_Position = u_mvp * vec4(a_position, 1.0);
    v_normal = a_normal;
    v_color = a_color;
    v_light_pos = u_light_vp * vec4(a_position, 1.0);
}
"#;

const MESH_FRAG: &str = r#"#version 330 core
uniform vec3 u_light_dir;
uniform float u_ambient;
uniform float u_directional;
uniform float u_shadows;
uniform sampler2D u_shadow_map;

in vec3 v_normal;
in vec3 v_color;
in vec4 v_light_pos;

out vec4 frag_color;

// Fraction of the directional light reaching this fragment, 3x3 PCF
float light_visibility() {
    if (u_shadows < 0.5) return 1.0;
    vec3 p = v_light_pos.xyz / v_light_pos.w * 0.5 + 0.5;
    if (p.x < 0.0 || p.x > 1.0 || p.y < 0.0 || p.y > 1.0 || p.z > 1.0) return 1.0;

    vec2 texel = 1.0 / vec2(textureSize(u_shadow_map, 0));
    float visible = 0.0;
    for (int x = -1; x <= 1; ++x) {
        for (int y = -1; y <= 1; ++y) {
            float nearest = texture(u_shadow_map, p.xy + vec2(x, y) * texel).r;
            visible += p.z - 0.001 <= nearest ? 1.0 : 0.0;
        }
    }
    return visible / 9.0;
}

void main() {
    vec3 n = normalize(v_normal);
    float diffuse = max(dot(n, u_light_dir), 0.0);
    vec3 lit = v_color * (u_ambient + diffuse * u_directional * light_visibility());
    frag_color = vec4(min(lit, vec3(1.0)), 1.0);
}
"#;

const SHADOW_VERT: &str = r#"#version 330 core
uniform mat4 u_light_vp;

layout(location = 0) in vec3 a_position;

void main() {
    gl_Position = u_light_vp * vec4(a_position, 1.0);
}
"#;

const SHADOW_FRAG: &str = r#"#version 330 core
void main() {}
"#;

const LINE_VERT: &str = r#"#version 330 core
uniform mat4 u_mvp;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec4 a_color;

out vec4 v_color;

void main() {
    gl_Position = u_mvp * vec4(a_position, 1.0);
    v_color = a_color;
}
"#;

const LINE_FRAG: &str = r#"#version 330 core
in vec4 v_color;
out vec4 frag_color;

void main() {
    frag_color = v_color;
}
"#;
